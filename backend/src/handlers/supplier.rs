//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CreateSupplierInput, Supplier, UpdateSupplierInput};
use crate::services::SupplierService;
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// Get a single supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.create_supplier(input).await?;
    Ok(Json(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.update_supplier(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = SupplierService::new(state.db);
    service.delete_supplier(supplier_id).await?;
    Ok(Json(()))
}
