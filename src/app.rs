use crate::handlers::{goals, leaderboard, logs, social};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(leaderboard::index))
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .route("/api/users/:user_id/summary", get(leaderboard::get_summary))
        .route(
            "/api/users/:user_id/logs",
            get(logs::list_logs).post(logs::log_progress),
        )
        .route("/api/users/:user_id/logs/:date", patch(logs::edit_log))
        .route(
            "/api/users/:user_id/goals",
            get(goals::list_goals).post(goals::create_goal),
        )
        .route("/api/goals/:goal_id", patch(goals::update_goal))
        .route("/api/goals/:goal_id/complete", post(goals::complete_goal))
        .route(
            "/api/users/:user_id/profile",
            get(social::get_profile).put(social::put_profile),
        )
        .route(
            "/api/users/:user_id/friends",
            get(leaderboard::friends_leaderboard).post(social::send_friend_request),
        )
        .route(
            "/api/users/:user_id/friends/:other_id",
            get(social::friend_status),
        )
        .route(
            "/api/users/:user_id/friend-requests",
            get(social::pending_requests),
        )
        .route(
            "/api/friend-requests/:request_id/accept",
            post(social::accept_friend_request),
        )
        .route(
            "/api/friend-requests/:request_id",
            delete(social::decline_friend_request),
        )
        .route(
            "/api/chat",
            get(social::chat_history).post(social::post_message),
        )
        .with_state(state)
}
