//! CSV import of supply items
//!
//! Expected columns: name, unit_type, items_per_box, minimum_stock,
//! current_stock, supplier_name. The header row is skipped; rows that
//! cannot be parsed are counted and skipped, not fatal.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::UnitType;

/// Import service
#[derive(Clone)]
pub struct ImportService {
    db: PgPool,
}

/// Result of one import run
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: u32,
    pub errors: u32,
}

/// One successfully parsed CSV row
#[derive(Debug, PartialEq, Eq)]
struct ParsedItemRow {
    name: String,
    unit_type: UnitType,
    items_per_box: Option<i32>,
    minimum_stock: i32,
    current_stock: i32,
    supplier_name: Option<String>,
}

/// Parse one data row. Returns `None` for rows that must be counted as
/// errors; blank rows are the caller's concern.
fn parse_item_row(record: &csv::StringRecord) -> Option<ParsedItemRow> {
    // Minimum required columns: name .. current_stock
    if record.len() < 5 {
        return None;
    }

    let name = record.get(0)?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let unit_type = match record.get(1) {
        Some(value) if !value.trim().is_empty() => UnitType::parse_or_default(value),
        _ => UnitType::Individual,
    };

    let items_per_box = match unit_type {
        UnitType::Box => match record.get(2).map(str::trim) {
            Some(value) if !value.is_empty() => Some(value.parse::<i32>().ok()?),
            _ => Some(1),
        },
        UnitType::Individual => None,
    };

    let minimum_stock = match record.get(3).map(str::trim) {
        Some(value) if !value.is_empty() => value.parse::<i32>().ok()?,
        _ => 1,
    };
    let current_stock = match record.get(4).map(str::trim) {
        Some(value) if !value.is_empty() => value.parse::<i32>().ok()?,
        _ => 0,
    };

    if minimum_stock < 0 || current_stock < 0 || items_per_box.is_some_and(|n| n <= 0) {
        return None;
    }

    let supplier_name = record
        .get(5)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Some(ParsedItemRow {
        name,
        unit_type,
        items_per_box,
        minimum_stock,
        current_stock,
        supplier_name,
    })
}

impl ImportService {
    /// Create a new ImportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Import items from an uploaded CSV file
    pub async fn import_items_csv(&self, filename: &str, bytes: &[u8]) -> AppResult<ImportSummary> {
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(AppError::ImportError("only CSV files are supported".to_string()));
        }

        // Tolerate a UTF-8 BOM and invalid byte sequences
        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
        let content = String::from_utf8_lossy(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut parsed_rows = Vec::new();
        let mut errors = 0u32;

        for record in reader.records() {
            let record =
                record.map_err(|e| AppError::ImportError(format!("CSV parse error: {}", e)))?;

            // Blank rows are skipped silently
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            match parse_item_row(&record) {
                Some(row) => parsed_rows.push(row),
                None => {
                    tracing::warn!("Skipping unparsable CSV row: {:?}", record);
                    errors += 1;
                }
            }
        }

        if parsed_rows.is_empty() {
            return Err(AppError::ImportError("no importable item rows".to_string()));
        }

        let mut tx = self.db.begin().await?;
        let mut imported = 0u32;

        for row in &parsed_rows {
            // Supplier is matched by exact name and silently left unset
            // when no match exists
            let supplier_id = match &row.supplier_name {
                Some(name) => {
                    sqlx::query_scalar::<_, Uuid>("SELECT id FROM suppliers WHERE name = $1")
                        .bind(name)
                        .fetch_optional(&mut *tx)
                        .await?
                }
                None => None,
            };

            sqlx::query(
                r#"
                INSERT INTO items (name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&row.name)
            .bind(row.unit_type.as_str())
            .bind(row.items_per_box)
            .bind(row.minimum_stock)
            .bind(row.current_stock)
            .bind(supplier_id)
            .execute(&mut *tx)
            .await?;

            imported += 1;
        }

        tx.commit().await?;

        Ok(ImportSummary { imported, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parses_full_box_row() {
        let row = parse_item_row(&record(&[
            "Disposable gloves M",
            "box",
            "100",
            "5",
            "10",
            "Sample Medical Devices",
        ]))
        .unwrap();

        assert_eq!(row.name, "Disposable gloves M");
        assert_eq!(row.unit_type, UnitType::Box);
        assert_eq!(row.items_per_box, Some(100));
        assert_eq!(row.minimum_stock, 5);
        assert_eq!(row.current_stock, 10);
        assert_eq!(row.supplier_name.as_deref(), Some("Sample Medical Devices"));
    }

    #[test]
    fn individual_row_ignores_per_box_column() {
        let row = parse_item_row(&record(&["Alcohol swabs", "individual", "", "10", "15"])).unwrap();
        assert_eq!(row.unit_type, UnitType::Individual);
        assert_eq!(row.items_per_box, None);
        assert_eq!(row.supplier_name, None);
    }

    #[test]
    fn unknown_unit_type_defaults_to_individual() {
        let row = parse_item_row(&record(&["Thermometer", "carton", "", "5", "6"])).unwrap();
        assert_eq!(row.unit_type, UnitType::Individual);
    }

    #[test]
    fn defaults_applied_for_empty_stock_columns() {
        let row = parse_item_row(&record(&["Stethoscope", "individual", "", "", ""])).unwrap();
        assert_eq!(row.minimum_stock, 1);
        assert_eq!(row.current_stock, 0);
    }

    #[test]
    fn box_without_per_box_count_defaults_to_one() {
        let row = parse_item_row(&record(&["Syringes 10ml", "box", "", "3", "5"])).unwrap();
        assert_eq!(row.items_per_box, Some(1));
    }

    #[test]
    fn short_row_is_an_error() {
        assert!(parse_item_row(&record(&["Gloves", "box", "100"])).is_none());
    }

    #[test]
    fn blank_name_is_an_error() {
        assert!(parse_item_row(&record(&["  ", "box", "100", "5", "10"])).is_none());
    }

    #[test]
    fn non_numeric_stock_is_an_error() {
        assert!(parse_item_row(&record(&["Gloves", "box", "100", "five", "10"])).is_none());
        assert!(parse_item_row(&record(&["Gloves", "box", "abc", "5", "10"])).is_none());
    }

    #[test]
    fn negative_stock_is_an_error() {
        assert!(parse_item_row(&record(&["Gloves", "box", "100", "-1", "10"])).is_none());
        assert!(parse_item_row(&record(&["Gloves", "box", "100", "5", "-2"])).is_none());
    }
}
