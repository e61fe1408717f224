use crate::errors::AppError;
use crate::models::{LogEntry, LogProgressRequest};
use crate::services;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;

pub async fn list_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<LogEntry>> {
    let data = state.data.lock().await;
    Json(services::list_logs(&data, &user_id))
}

pub async fn log_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<LogProgressRequest>,
) -> Result<(StatusCode, Json<LogEntry>), AppError> {
    let today = state.today();
    let (entry, created) = state
        .mutate(|data| services::log_progress(data, &user_id, today, payload.description))
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(entry)))
}

pub async fn edit_log(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(String, NaiveDate)>,
    Json(payload): Json<LogProgressRequest>,
) -> Result<Json<LogEntry>, AppError> {
    let entry = state
        .mutate(|data| services::edit_log_description(data, &user_id, date, payload.description))
        .await?;
    Ok(Json(entry))
}
