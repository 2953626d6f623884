//! Inventory item endpoints under `/items`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::Utc;

use super::{AppState, extract::ApiJson};
use crate::{
    error::ApiResult,
    models::{
        MessageResponse,
        item::{EmailCount, ItemFilterOutcome, ItemFilterParams, ItemResponse, ItemUpdate, NewItem},
    },
};

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/filter", get(filter_items))
        .route("/items/aggregate", get(aggregate_items))
        .route("/items/:id", get(get_item).put(update_item).delete(delete_item))
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(item): ApiJson<NewItem>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.items.create(item, Utc::now()).await?))
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<ItemResponse>>> {
    Ok(Json(state.items.list_all().await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    Ok(Json(state.items.get_by_id(&id).await?))
}

async fn filter_items(
    State(state): State<AppState>,
    Query(params): Query<ItemFilterParams>,
) -> ApiResult<Json<ItemFilterOutcome>> {
    Ok(Json(state.items.filter(params).await?))
}

async fn aggregate_items(State(state): State<AppState>) -> ApiResult<Json<Vec<EmailCount>>> {
    Ok(Json(state.items.aggregate().await?))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ItemUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.items.update(&id, update).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.items.delete(&id).await?))
}
