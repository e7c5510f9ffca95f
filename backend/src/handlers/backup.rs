//! HTTP handlers for backup, restore, and bulk clear

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::backup::{BackupDocument, ClearDataInput, RestoreSummary};
use crate::services::BackupService;
use crate::AppState;

/// Export the whole database as JSON
pub async fn export_backup(State(state): State<AppState>) -> AppResult<Json<BackupDocument>> {
    let service = BackupService::new(state.db);
    let document = service.export().await?;
    Ok(Json(document))
}

/// Replace the whole database with a backup document
pub async fn restore_backup(
    State(state): State<AppState>,
    Json(document): Json<BackupDocument>,
) -> AppResult<Json<RestoreSummary>> {
    let service = BackupService::new(state.db);
    let summary = service.restore(document).await?;
    Ok(Json(summary))
}

/// Delete all data; suppliers only when requested
pub async fn clear_all_data(
    State(state): State<AppState>,
    input: Option<Json<ClearDataInput>>,
) -> AppResult<Json<()>> {
    let service = BackupService::new(state.db);
    let input = input.map(|Json(input)| input).unwrap_or_default();
    service.clear_all(input).await?;
    Ok(Json(()))
}
