//! HTTP handlers for supply item endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CreateItemInput, Item, SetStockInput, UpdateItemInput};
use crate::services::ItemService;
use crate::AppState;

/// List all items
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let service = ItemService::new(state.db);
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Get a single item
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    let service = ItemService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<Item>> {
    let service = ItemService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Update an item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<Item>> {
    let service = ItemService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Inline stock-level edit
pub async fn set_item_stock(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<SetStockInput>,
) -> AppResult<Json<Item>> {
    let service = ItemService::new(state.db);
    let item = service.set_stock(item_id, input).await?;
    Ok(Json(item))
}

/// Delete an item
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ItemService::new(state.db);
    service.delete_item(item_id).await?;
    Ok(Json(()))
}
