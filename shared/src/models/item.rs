//! Supply item models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an item is counted and ordered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    #[default]
    Individual,
    Box,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Individual => "individual",
            UnitType::Box => "box",
        }
    }

    /// Unit label printed on purchase-order documents
    pub fn document_label(&self) -> &'static str {
        match self {
            UnitType::Individual => "pcs",
            UnitType::Box => "box",
        }
    }

    /// Parse a stored or imported value; anything unrecognized falls back
    /// to `Individual`, matching the CSV import rules.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "box" => UnitType::Box,
            _ => UnitType::Individual,
        }
    }
}

/// A stocked supply item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub unit_type: UnitType,
    /// Count per box; only meaningful when `unit_type` is `Box`
    pub items_per_box: Option<i32>,
    /// Reorder threshold
    pub minimum_stock: i32,
    /// Never negative; consumption clamps at zero
    pub current_stock: i32,
    pub supplier_id: Option<Uuid>,
}

impl Item {
    /// Whether a reorder should be placed for this item right now.
    /// True when stock is at or below the threshold and a supplier is set.
    pub fn reorder_due(&self) -> bool {
        crate::reorder::reorder_triggered(
            self.current_stock,
            self.minimum_stock,
            self.supplier_id.is_some(),
        )
    }
}

/// Input for creating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub unit_type: UnitType,
    pub items_per_box: Option<i32>,
    #[serde(default)]
    pub minimum_stock: i32,
    #[serde(default)]
    pub current_stock: i32,
    pub supplier_id: Option<Uuid>,
}

/// Input for updating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub unit_type: Option<UnitType>,
    pub items_per_box: Option<i32>,
    pub minimum_stock: Option<i32>,
    pub current_stock: Option<i32>,
    pub supplier_id: Option<Option<Uuid>>,
}

/// Input for the inline stock-level edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStockInput {
    pub current_stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(current: i32, minimum: i32, supplier: bool) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: "Disposable gloves M".to_string(),
            unit_type: UnitType::Box,
            items_per_box: Some(100),
            minimum_stock: minimum,
            current_stock: current,
            supplier_id: supplier.then(Uuid::new_v4),
        }
    }

    #[test]
    fn reorder_due_at_threshold() {
        assert!(item(5, 5, true).reorder_due());
        assert!(item(4, 5, true).reorder_due());
        assert!(!item(6, 5, true).reorder_due());
    }

    #[test]
    fn reorder_not_due_without_supplier() {
        assert!(!item(0, 5, false).reorder_due());
    }

    #[test]
    fn unit_type_parse_falls_back_to_individual() {
        assert_eq!(UnitType::parse_or_default("box"), UnitType::Box);
        assert_eq!(UnitType::parse_or_default(" BOX "), UnitType::Box);
        assert_eq!(UnitType::parse_or_default("carton"), UnitType::Individual);
        assert_eq!(UnitType::parse_or_default(""), UnitType::Individual);
    }
}
