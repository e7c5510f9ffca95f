//! Clinic information: the ordering party printed on documents

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Singleton record describing the clinic. Lazily created with a default
/// name on first access; edited via the settings endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicInfo {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Clinic director's name, printed on order documents
    pub director: Option<String>,
}

/// Input for updating clinic information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClinicInfoInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub director: Option<String>,
}
