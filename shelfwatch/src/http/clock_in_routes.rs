//! Clock-in record endpoints under `/clock-in`.

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
        clock_in::{
            ClockInFilterParams, ClockInResponse, ClockInUpdate, NewClockInRecord,
            RawClockInDocument,
        },
    },
};

pub fn clock_in_routes() -> Router<AppState> {
    Router::new()
        .route("/clock-in", get(list_records).post(create_record))
        .route("/clock-in/filter", get(filter_records))
        .route("/clock-in/:id", get(get_record).put(update_record).delete(delete_record))
}

async fn create_record(
    State(state): State<AppState>,
    ApiJson(record): ApiJson<NewClockInRecord>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.clock_ins.create(record, Utc::now()).await?))
}

async fn list_records(State(state): State<AppState>) -> ApiResult<Json<Vec<ClockInResponse>>> {
    Ok(Json(state.clock_ins.list_all().await?))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClockInResponse>> {
    Ok(Json(state.clock_ins.get_by_id(&id).await?))
}

async fn filter_records(
    State(state): State<AppState>,
    Query(params): Query<ClockInFilterParams>,
) -> ApiResult<Json<Vec<RawClockInDocument>>> {
    Ok(Json(state.clock_ins.filter(params).await?))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ClockInUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.clock_ins.update(&id, update).await?))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.clock_ins.delete(&id).await?))
}
