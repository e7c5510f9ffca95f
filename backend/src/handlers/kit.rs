//! HTTP handlers for kit endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    CreateItemKitInput, CreatePatientKitInput, ItemKit, PatientKit, ReplaceKitLinesInput,
};
use crate::services::kit::{ItemKitDetail, PatientKitDetail};
use crate::services::KitService;
use crate::AppState;

/// List all generic kits
pub async fn list_item_kits(State(state): State<AppState>) -> AppResult<Json<Vec<ItemKit>>> {
    let service = KitService::new(state.db);
    let kits = service.list_item_kits().await?;
    Ok(Json(kits))
}

/// Get a generic kit with its lines
pub async fn get_item_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
) -> AppResult<Json<ItemKitDetail>> {
    let service = KitService::new(state.db);
    let kit = service.get_item_kit(kit_id).await?;
    Ok(Json(kit))
}

/// Create a generic kit
pub async fn create_item_kit(
    State(state): State<AppState>,
    Json(input): Json<CreateItemKitInput>,
) -> AppResult<Json<ItemKitDetail>> {
    let service = KitService::new(state.db);
    let kit = service.create_item_kit(input).await?;
    Ok(Json(kit))
}

/// Replace a generic kit's lines
pub async fn replace_item_kit_lines(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
    Json(input): Json<ReplaceKitLinesInput>,
) -> AppResult<Json<ItemKitDetail>> {
    let service = KitService::new(state.db);
    let kit = service.replace_item_kit_lines(kit_id, input).await?;
    Ok(Json(kit))
}

/// Delete a generic kit
pub async fn delete_item_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = KitService::new(state.db);
    service.delete_item_kit(kit_id).await?;
    Ok(Json(()))
}

/// List all patient kits
pub async fn list_patient_kits(State(state): State<AppState>) -> AppResult<Json<Vec<PatientKit>>> {
    let service = KitService::new(state.db);
    let kits = service.list_patient_kits().await?;
    Ok(Json(kits))
}

/// List the kits bound to one patient
pub async fn list_patient_kits_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> AppResult<Json<Vec<PatientKit>>> {
    let service = KitService::new(state.db);
    let kits = service.list_patient_kits_for_patient(patient_id).await?;
    Ok(Json(kits))
}

/// Get a patient kit with its lines
pub async fn get_patient_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
) -> AppResult<Json<PatientKitDetail>> {
    let service = KitService::new(state.db);
    let kit = service.get_patient_kit(kit_id).await?;
    Ok(Json(kit))
}

/// Create a patient kit
pub async fn create_patient_kit(
    State(state): State<AppState>,
    Json(input): Json<CreatePatientKitInput>,
) -> AppResult<Json<PatientKitDetail>> {
    let service = KitService::new(state.db);
    let kit = service.create_patient_kit(input).await?;
    Ok(Json(kit))
}

/// Replace a patient kit's lines
pub async fn replace_patient_kit_lines(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
    Json(input): Json<ReplaceKitLinesInput>,
) -> AppResult<Json<PatientKitDetail>> {
    let service = KitService::new(state.db);
    let kit = service.replace_patient_kit_lines(kit_id, input).await?;
    Ok(Json(kit))
}

/// Delete a patient kit
pub async fn delete_patient_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = KitService::new(state.db);
    service.delete_patient_kit(kit_id).await?;
    Ok(Json(()))
}
