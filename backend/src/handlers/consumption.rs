//! HTTP handlers for consumption endpoints
//!
//! Each endpoint runs one consumption batch; the response carries the
//! orders generated during the batch so clients can navigate to the
//! first one.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::RecordUsageInput;
use crate::services::consumption::{BatchOutcome, UsageDetail, UsageFilter, UseItemKitInput};
use crate::services::ConsumptionService;
use crate::AppState;
use shared::types::{PaginatedResponse, Pagination};

/// Query parameters for usage listings
#[derive(Debug, Default, Deserialize)]
pub struct UsageListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub item_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
}

/// Record an ad-hoc consumption batch
pub async fn record_usage(
    State(state): State<AppState>,
    Json(input): Json<RecordUsageInput>,
) -> AppResult<Json<BatchOutcome>> {
    let service = ConsumptionService::new(state.db);
    let outcome = service.record_usage(input).await?;
    Ok(Json(outcome))
}

/// Record a bulk consumption batch. Same batch semantics as the ad-hoc
/// endpoint; kept as its own route for the bulk entry form.
pub async fn record_bulk_usage(
    State(state): State<AppState>,
    Json(input): Json<RecordUsageInput>,
) -> AppResult<Json<BatchOutcome>> {
    let service = ConsumptionService::new(state.db);
    let outcome = service.record_usage(input).await?;
    Ok(Json(outcome))
}

/// List usage records
pub async fn list_usages(
    State(state): State<AppState>,
    Query(params): Query<UsageListParams>,
) -> AppResult<Json<PaginatedResponse<UsageDetail>>> {
    let service = ConsumptionService::new(state.db);

    let defaults = Pagination::default();
    let pagination = Pagination {
        page: params.page.unwrap_or(defaults.page),
        per_page: params.per_page.unwrap_or(defaults.per_page),
    };
    let filter = UsageFilter {
        item_id: params.item_id,
        patient_id: params.patient_id,
    };

    let usages = service.list_usages(filter, pagination).await?;
    Ok(Json(usages))
}

/// Consume a patient kit
pub async fn use_patient_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
) -> AppResult<Json<BatchOutcome>> {
    let service = ConsumptionService::new(state.db);
    let outcome = service.use_patient_kit(kit_id).await?;
    Ok(Json(outcome))
}

/// Consume a generic kit, optionally attributed to a patient
pub async fn use_item_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
    input: Option<Json<UseItemKitInput>>,
) -> AppResult<Json<BatchOutcome>> {
    let service = ConsumptionService::new(state.db);
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let outcome = service.use_item_kit(kit_id, input).await?;
    Ok(Json(outcome))
}
