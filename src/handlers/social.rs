use crate::errors::AppError;
use crate::models::{
    ChatMessageView, FriendRequestBody, FriendStatusResponse, Friendship, PendingRequest,
    PostMessageRequest, Profile, ProfileRequest,
};
use crate::services;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let data = state.data.lock().await;
    services::get_profile(&data, &user_id).map(Json)
}

pub async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .mutate(|data| services::upsert_profile(data, &user_id, payload))
        .await?;
    Ok(Json(profile))
}

pub async fn send_friend_request(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<FriendRequestBody>,
) -> Result<(StatusCode, Json<Friendship>), AppError> {
    let friendship = state
        .mutate(|data| services::send_friend_request(data, &user_id, &payload.friend_user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(friendship)))
}

pub async fn friend_status(
    State(state): State<AppState>,
    Path((user_id, other_id)): Path<(String, String)>,
) -> Json<FriendStatusResponse> {
    let data = state.data.lock().await;
    Json(FriendStatusResponse {
        status: services::friend_status(&data, &user_id, &other_id),
    })
}

pub async fn pending_requests(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<PendingRequest>> {
    let data = state.data.lock().await;
    Json(services::pending_requests(&data, &user_id))
}

pub async fn accept_friend_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Friendship>, AppError> {
    let friendship = state
        .mutate(|data| services::accept_friend_request(data, request_id))
        .await?;
    Ok(Json(friendship))
}

pub async fn decline_friend_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .mutate(|data| services::decline_friend_request(data, request_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn chat_history(State(state): State<AppState>) -> Json<Vec<ChatMessageView>> {
    let data = state.data.lock().await;
    Json(services::chat_history(&data))
}

pub async fn post_message(
    State(state): State<AppState>,
    Json(payload): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageView>), AppError> {
    let message = state
        .mutate(|data| services::post_message(data, &payload.user_id, &payload.message))
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
