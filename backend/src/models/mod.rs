//! Database models for the Clinic Supply Management server
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
