//! Kit models: reusable bundles of supply items
//!
//! A kit is either generic (usable for any patient) or bound to one
//! patient. Both own a list of (item, quantity) lines.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generic kit, usable for any (or no) patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemKit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A kit bound to one patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientKit {
    pub id: Uuid,
    pub name: String,
    pub patient_id: Uuid,
}

/// One line of a kit: an item and the quantity consumed per use.
/// Exactly one of the parent references is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitItem {
    pub id: Uuid,
    pub patient_kit_id: Option<Uuid>,
    pub item_kit_id: Option<Uuid>,
    pub item_id: Uuid,
    pub quantity: i32,
}

/// A kit line as submitted by clients; quantities are validated positive
/// at kit-authoring time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitLineInput {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Input for creating a generic kit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemKitInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub lines: Vec<KitLineInput>,
}

/// Input for creating a patient kit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientKitInput {
    pub name: String,
    pub patient_id: Uuid,
    #[serde(default)]
    pub lines: Vec<KitLineInput>,
}

/// Input for replacing a kit's line set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceKitLinesInput {
    pub lines: Vec<KitLineInput>,
}
