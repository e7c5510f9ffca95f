//! HTTP handlers for clinic settings endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::{ClinicInfo, UpdateClinicInfoInput};
use crate::services::ClinicService;
use crate::AppState;

/// Get the clinic record, initializing it on first access
pub async fn get_clinic_info(State(state): State<AppState>) -> AppResult<Json<ClinicInfo>> {
    let service = ClinicService::new(state.db.clone());
    let clinic = service
        .get_or_init(&state.config.clinic.default_name)
        .await?;
    Ok(Json(clinic))
}

/// Update the clinic record
pub async fn update_clinic_info(
    State(state): State<AppState>,
    Json(input): Json<UpdateClinicInfoInput>,
) -> AppResult<Json<ClinicInfo>> {
    let service = ClinicService::new(state.db.clone());
    let clinic = service
        .update(&state.config.clinic.default_name, input)
        .await?;
    Ok(Json(clinic))
}
