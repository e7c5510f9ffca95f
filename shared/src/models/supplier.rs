//! Supplier models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A supplier orders are transmitted to (by fax, per clinic practice)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    /// Required: the order transmission channel
    pub fax_number: String,
    pub address: Option<String>,
    pub email: Option<String>,
}

/// Input for creating a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub fax_number: String,
    pub address: Option<String>,
    pub email: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub fax_number: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}
