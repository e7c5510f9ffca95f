//! Shared types and models for the Clinic Supply Management system
//!
//! This crate contains the domain records, the pure reorder rules, and
//! validation helpers used by the backend server and its tests.

pub mod models;
pub mod reorder;
pub mod types;
pub mod validation;

pub use models::*;
pub use reorder::*;
pub use types::*;
pub use validation::*;
