//! Monthly reporting: per-item usage and ordered totals

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Per-item total for one month
#[derive(Debug, Serialize, FromRow)]
pub struct ItemTotal {
    pub item_id: Uuid,
    pub item_name: String,
    pub total_quantity: i64,
}

/// Monthly usage and order totals
#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub usage_totals: Vec<ItemTotal>,
    pub order_totals: Vec<ItemTotal>,
}

/// Report period; defaults to the current month
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyReportParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Flattened report row for CSV export
#[derive(Debug, Serialize)]
struct ReportCsvRow<'a> {
    category: &'static str,
    item_name: &'a str,
    total_quantity: i64,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the monthly report for the given (or current) month
    pub async fn monthly_report(&self, params: MonthlyReportParams) -> AppResult<MonthlyReport> {
        let now = Utc::now();
        let year = params.year.unwrap_or_else(|| now.year());
        let month = params.month.unwrap_or_else(|| now.month());

        let (start, end) = Self::month_bounds(year, month)?;

        let usage_totals = sqlx::query_as::<_, ItemTotal>(
            r#"
            SELECT i.id AS item_id, i.name AS item_name,
                   SUM(u.quantity)::bigint AS total_quantity
            FROM usages u
            JOIN items i ON i.id = u.item_id
            WHERE u.used_at >= $1 AND u.used_at < $2
            GROUP BY i.id, i.name
            ORDER BY i.name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let order_totals = sqlx::query_as::<_, ItemTotal>(
            r#"
            SELECT i.id AS item_id, i.name AS item_name,
                   SUM(oi.quantity)::bigint AS total_quantity
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN items i ON i.id = oi.item_id
            WHERE o.order_date >= $1 AND o.order_date < $2
            GROUP BY i.id, i.name
            ORDER BY i.name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(MonthlyReport {
            year,
            month,
            usage_totals,
            order_totals,
        })
    }

    /// Build the monthly report and render it as CSV
    pub async fn monthly_report_csv(&self, params: MonthlyReportParams) -> AppResult<String> {
        let report = self.monthly_report(params).await?;

        let rows: Vec<ReportCsvRow> = report
            .usage_totals
            .iter()
            .map(|total| ReportCsvRow {
                category: "usage",
                item_name: &total.item_name,
                total_quantity: total.total_quantity,
            })
            .chain(report.order_totals.iter().map(|total| ReportCsvRow {
                category: "ordered",
                item_name: &total.item_name,
                total_quantity: total.total_quantity,
            }))
            .collect();

        Self::export_to_csv(&rows)
    }

    /// Export report data as CSV
    fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    /// Half-open UTC range [first of month, first of next month)
    fn month_bounds(year: i32, month: u32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            AppError::Validation {
                field: "month".to_string(),
                message: "Invalid year or month".to_string(),
                message_ja: "年月の指定が正しくありません".to_string(),
            }
        })?;

        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| AppError::Internal("month arithmetic overflow".to_string()))?;

        Ok((
            Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default()),
            Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0).unwrap_or_default()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_one_month() {
        let (start, end) = ReportService::month_bounds(2025, 3).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-04-01T00:00:00+00:00");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = ReportService::month_bounds(2024, 12).unwrap();
        assert_eq!(start.year(), 2024);
        assert_eq!(end.year(), 2025);
        assert_eq!(end.month(), 1);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(ReportService::month_bounds(2025, 0).is_err());
        assert!(ReportService::month_bounds(2025, 13).is_err());
    }
}
