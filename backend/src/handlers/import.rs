//! HTTP handler for the CSV item import

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::import::ImportSummary;
use crate::services::ImportService;
use crate::AppState;

/// Import items from an uploaded CSV file (multipart field `csv_file`)
pub async fn import_items(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ImportError(format!("invalid multipart payload: {}", e)))?
    {
        let is_csv_field = field.name() == Some("csv_file") || field.file_name().is_some();
        if !is_csv_field {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::ImportError(format!("failed to read upload: {}", e)))?;

        let service = ImportService::new(state.db.clone());
        let summary = service.import_items_csv(&filename, &bytes).await?;
        return Ok(Json(summary));
    }

    Err(AppError::ImportError("no CSV file in request".to_string()))
}
