use std::sync::Arc;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use lifeplan_core::constants::DATE_FORMAT;
use lifeplan_core::schedules::{BlockPatch, DaySchedule, ScheduleUpdate};
use serde::{de::DeserializeOwned, Deserialize};

#[derive(Deserialize)]
struct DateQuery {
    date: Option<String>,
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid body: {e}")))
}

fn parse_date(raw: Option<&str>) -> ApiResult<NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing date".to_string()))?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<DaySchedule>> {
    let date = parse_date(query.date.as_deref())?;
    let day = state.schedule_service.get_day(&user.user_id, date)?;
    Ok(Json(day))
}

async fn replace_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Json<DaySchedule>> {
    let update: ScheduleUpdate = parse_body(&body)?;
    let day = state
        .schedule_service
        .replace_blocks(&user.user_id, update)
        .await?;
    tracing::info!(
        schedule_id = day.id.as_deref().unwrap_or_default(),
        blocks = day.blocks.len(),
        "Saved schedule"
    );
    Ok(Json(day))
}

async fn update_block(
    Path((schedule_id, block_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Json<DaySchedule>> {
    let patch: BlockPatch = parse_body(&body)?;
    let day = state
        .schedule_service
        .update_block(&user.user_id, &schedule_id, &block_id, patch)
        .await?;
    Ok(Json(day))
}

async fn delete_block(
    Path((schedule_id, block_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<DaySchedule>> {
    let day = state
        .schedule_service
        .delete_block(&user.user_id, &schedule_id, &block_id)
        .await?;
    tracing::info!(%schedule_id, %block_id, "Deleted block");
    Ok(Json(day))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/schedules", get(get_schedule).put(replace_schedule))
        .route(
            "/schedules/{id}/blocks/{block_id}",
            patch(update_block).delete(delete_block),
        )
}
