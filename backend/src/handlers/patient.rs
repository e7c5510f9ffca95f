//! HTTP handlers for patient endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CreatePatientInput, Patient, UpdatePatientInput};
use crate::services::PatientService;
use crate::AppState;

/// List all patients
pub async fn list_patients(State(state): State<AppState>) -> AppResult<Json<Vec<Patient>>> {
    let service = PatientService::new(state.db);
    let patients = service.list_patients().await?;
    Ok(Json(patients))
}

/// Get a single patient
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> AppResult<Json<Patient>> {
    let service = PatientService::new(state.db);
    let patient = service.get_patient(patient_id).await?;
    Ok(Json(patient))
}

/// Create a patient
pub async fn create_patient(
    State(state): State<AppState>,
    Json(input): Json<CreatePatientInput>,
) -> AppResult<Json<Patient>> {
    let service = PatientService::new(state.db);
    let patient = service.create_patient(input).await?;
    Ok(Json(patient))
}

/// Update a patient
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(input): Json<UpdatePatientInput>,
) -> AppResult<Json<Patient>> {
    let service = PatientService::new(state.db);
    let patient = service.update_patient(patient_id, input).await?;
    Ok(Json(patient))
}

/// Delete a patient
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PatientService::new(state.db);
    service.delete_patient(patient_id).await?;
    Ok(Json(()))
}
