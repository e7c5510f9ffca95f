//! Consumption records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable record of stock being consumed. Created only by the
/// consumption endpoints; never updated (bulk clear excepted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub used_at: DateTime<Utc>,
    pub patient_id: Option<Uuid>,
}

/// One line of an ad-hoc consumption batch. The item reference may be
/// absent and the quantity non-positive; such lines are skipped, not fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLineInput {
    pub item_id: Option<Uuid>,
    #[serde(default)]
    pub quantity: i32,
}

/// An ad-hoc consumption batch: a list of lines plus an optional patient
/// the whole batch is attributed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordUsageInput {
    pub patient_id: Option<Uuid>,
    pub lines: Vec<UsageLineInput>,
}
