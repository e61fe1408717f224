use crate::leaderboard::RankBy;
use crate::models::{LeaderboardQuery, LeaderboardRow, UserSummary};
use crate::services;
use crate::state::AppState;
use crate::ui::render_leaderboard;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.today();
    let data = state.data.lock().await;
    let rows = services::global_leaderboard(&data, today, RankBy::Points, None);
    Html(render_leaderboard(today, &rows))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardRow>> {
    let today = state.today();
    let data = state.data.lock().await;
    Json(services::global_leaderboard(&data, today, query.by, query.limit))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<UserSummary> {
    let today = state.today();
    let data = state.data.lock().await;
    Json(services::user_summary(&data, &user_id, today))
}

pub async fn friends_leaderboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<LeaderboardRow>> {
    let today = state.today();
    let data = state.data.lock().await;
    Json(services::friends_leaderboard(&data, &user_id, today))
}
