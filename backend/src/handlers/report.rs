//! HTTP handlers for reporting endpoints

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::report::{MonthlyReport, MonthlyReportParams};
use crate::services::ReportService;
use crate::AppState;

/// Monthly usage and order totals
pub async fn monthly_report(
    State(state): State<AppState>,
    Query(params): Query<MonthlyReportParams>,
) -> AppResult<Json<MonthlyReport>> {
    let service = ReportService::new(state.db);
    let report = service.monthly_report(params).await?;
    Ok(Json(report))
}

/// Monthly report as a CSV download
pub async fn monthly_report_csv(
    State(state): State<AppState>,
    Query(params): Query<MonthlyReportParams>,
) -> AppResult<Response> {
    let service = ReportService::new(state.db);
    let csv_data = service.monthly_report_csv(params).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"monthly_report.csv\"",
        )
        .body(Body::from(csv_data))
        .map_err(|e| AppError::Internal(format!("response build error: {}", e)))
}
