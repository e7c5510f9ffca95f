//! Route definitions for the Clinic Supply Management server

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Item catalog
        .nest("/items", item_routes())
        // Supplier catalog
        .nest("/suppliers", supplier_routes())
        // Patients
        .nest("/patients", patient_routes())
        // Kits (generic and patient-bound)
        .nest("/kits", kit_routes())
        // Consumption recording
        .nest("/usage", usage_routes())
        // Purchase orders
        .nest("/orders", order_routes())
        // Clinic settings
        .nest("/clinic", clinic_routes())
        // Reports
        .nest("/reports", report_routes())
        // Administration: backup, restore, bulk clear
        .nest("/admin", admin_routes())
}

/// Item catalog routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route("/import", post(handlers::import_items))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/:item_id/stock", put(handlers::set_item_stock))
}

/// Supplier catalog routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

/// Patient routes
fn patient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/:patient_id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route(
            "/:patient_id/kits",
            get(handlers::list_patient_kits_for_patient),
        )
}

/// Kit routes: generic kits and patient kits, including kit consumption
fn kit_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/generic",
            get(handlers::list_item_kits).post(handlers::create_item_kit),
        )
        .route(
            "/generic/:kit_id",
            get(handlers::get_item_kit)
                .put(handlers::replace_item_kit_lines)
                .delete(handlers::delete_item_kit),
        )
        .route("/generic/:kit_id/use", post(handlers::use_item_kit))
        .route(
            "/patient",
            get(handlers::list_patient_kits).post(handlers::create_patient_kit),
        )
        .route(
            "/patient/:kit_id",
            get(handlers::get_patient_kit)
                .put(handlers::replace_patient_kit_lines)
                .delete(handlers::delete_patient_kit),
        )
        .route("/patient/:kit_id/use", post(handlers::use_patient_kit))
}

/// Consumption routes
fn usage_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_usages).post(handlers::record_usage))
        .route("/bulk", post(handlers::record_bulk_usage))
}

/// Purchase order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", put(handlers::set_order_status))
        .route("/:order_id/document", get(handlers::generate_order_document))
}

/// Clinic settings routes
fn clinic_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_clinic_info).put(handlers::update_clinic_info),
    )
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(handlers::monthly_report))
        .route("/monthly/csv", get(handlers::monthly_report_csv))
}

/// Administration routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/backup", get(handlers::export_backup))
        .route("/restore", post(handlers::restore_backup))
        .route("/clear", post(handlers::clear_all_data))
}
