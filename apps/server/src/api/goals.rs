use std::sync::Arc;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use lifeplan_core::goals::{Goal, GoalProgressUpdate, NewGoal};
use serde::Serialize;

pub const PROGRESS_UPDATED: &str = "Goal progress updated successfully";

#[derive(Serialize)]
pub struct ProgressResponse {
    pub message: String,
    pub goal: Goal,
}

async fn get_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.get_goals(&user.user_id)?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(goal): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let g = state.goal_service.create_goal(&user.user_id, goal).await?;
    tracing::info!(goal_id = %g.id, "Created goal");
    Ok((StatusCode::CREATED, Json(g)))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Goal>> {
    let g = state.goal_service.get_goal(&user.user_id, &id)?;
    Ok(Json(g))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<StatusCode> {
    state.goal_service.delete_goal(&user.user_id, &id).await?;
    tracing::info!(goal_id = %id, "Deleted goal");
    Ok(StatusCode::NO_CONTENT)
}

/// Fields that are missing, non-numeric or unparsable are ignored; the goal
/// is saved either way.
async fn update_progress(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Json<ProgressResponse>> {
    let update = GoalProgressUpdate::from_json_body(&body);
    if update.is_empty() {
        tracing::debug!(goal_id = %id, "Progress request carried no usable fields");
    }
    let goal = state
        .goal_service
        .update_progress(&user.user_id, &id, update)
        .await?;
    tracing::info!(goal_id = %goal.id, progress = goal.progress, "Updated goal progress");
    Ok(Json(ProgressResponse {
        message: PROGRESS_UPDATED.to_string(),
        goal,
    }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal))
        .route("/goals/{id}", get(get_goal).delete(delete_goal))
        .route(
            "/goals/{id}/progress",
            put(update_progress).fallback(method_not_allowed),
        )
}
