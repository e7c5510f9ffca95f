//! Business logic services for the Clinic Supply Management server

pub mod backup;
pub mod clinic;
pub mod consumption;
pub mod document;
pub mod import;
pub mod item;
pub mod kit;
pub mod order;
pub mod patient;
pub mod reorder;
pub mod report;
pub mod supplier;

pub use backup::BackupService;
pub use clinic::ClinicService;
pub use consumption::ConsumptionService;
pub use import::ImportService;
pub use item::ItemService;
pub use kit::KitService;
pub use order::OrderService;
pub use patient::PatientService;
pub use report::ReportService;
pub use supplier::SupplierService;
