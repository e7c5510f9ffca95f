//! HTTP handlers for purchase order endpoints

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::SetOrderStatusInput;
use crate::services::order::{OrderDetail, OrderSummary};
use crate::services::OrderService;
use crate::AppState;

/// List all orders, newest first
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<OrderSummary>>> {
    let service = OrderService::new(state.db);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Get an order with its lines
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Manually transition an order's status
pub async fn set_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<SetOrderStatusInput>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service.set_status(order_id, input).await?;
    Ok(Json(order))
}

/// Generate the purchase-order PDF. Advances a pending order to sent.
pub async fn generate_order_document(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Response> {
    let service = OrderService::new(state.db.clone());
    let bytes = service
        .generate_document(order_id, &state.config.clinic.default_name)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"order_{}.pdf\"", order_id),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("response build error: {}", e)))
}
