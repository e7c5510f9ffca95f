//! Patient models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patient receiving home-visit care
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// External chart/patient code (e.g. "P001")
    pub patient_code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Input for creating a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientInput {
    pub name: String,
    pub patient_code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Input for updating a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientInput {
    pub name: Option<String>,
    pub patient_code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}
