use crate::errors::AppError;
use crate::models::{CompleteGoalResponse, CreateGoalRequest, Goal, UpdateGoalRequest};
use crate::services;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list_goals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Goal>> {
    let data = state.data.lock().await;
    Json(services::list_goals(&data, &user_id))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let goal = state
        .mutate(|data| services::create_goal(data, &user_id, payload))
        .await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .mutate(|data| services::update_goal(data, goal_id, payload))
        .await?;
    Ok(Json(goal))
}

pub async fn complete_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<CompleteGoalResponse>, AppError> {
    let today = state.today();
    let response = state
        .mutate(|data| services::complete_goal(data, goal_id, today))
        .await?;
    Ok(Json(response))
}
