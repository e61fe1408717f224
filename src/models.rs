use crate::leaderboard::RankBy;
use crate::stats::Level;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const ANONYMOUS_NAME: &str = "Anonymous User";

/// One user's activity on one calendar day. At most one per (user_id, date).
///
/// Only the description is edited after creation, except that completing a goal
/// adds its reward to `points_earned` of that day's entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub user_id: String,
    pub date: NaiveDate,
    pub points_earned: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub points_reward: u32,
    #[serde(default)]
    pub completed: bool,
    /// Set once the reward has been credited; reopening the goal keeps it.
    #[serde(default)]
    pub rewarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn name(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.username.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    None,
    Pending,
    Accepted,
}

/// A friend request from `user_id` to `friend_user_id`, kept once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub id: Uuid,
    pub user_id: String,
    pub friend_user_id: String,
    pub status: FriendStatus,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.user_id == a && self.friend_user_id == b)
            || (self.user_id == b && self.friend_user_id == a)
    }

    pub fn other(&self, user_id: &str) -> Option<&str> {
        if self.user_id == user_id {
            Some(&self.friend_user_id)
        } else if self.friend_user_id == user_id {
            Some(&self.user_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    pub friendships: Vec<Friendship>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl AppData {
    pub fn logs_for<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.logs.iter().filter(move |entry| entry.user_id == user_id)
    }

    pub fn display_name(&self, user_id: &str) -> String {
        self.profiles
            .get(user_id)
            .and_then(Profile::name)
            .unwrap_or(ANONYMOUS_NAME)
            .to_string()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogProgressRequest {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub points_reward: Option<u32>,
}

/// Absent fields are left unchanged; an empty description clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub points_reward: Option<u32>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FriendRequestBody {
    pub friend_user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub by: RankBy,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub points: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    pub display_name: String,
    pub total_points: u64,
    pub current_streak: u32,
    pub level: Level,
    pub rank: Option<usize>,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub logged_today: bool,
    pub last_7_days: Vec<DailyPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub total_points: u64,
    pub current_streak: u32,
}

#[derive(Debug, Serialize)]
pub struct CompleteGoalResponse {
    pub goal: Goal,
    pub entry: LogEntry,
}

#[derive(Debug, Serialize)]
pub struct FriendStatusResponse {
    pub status: FriendStatus,
}

#[derive(Debug, Serialize)]
pub struct PendingRequest {
    pub id: Uuid,
    pub user_id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageView {
    pub id: Uuid,
    pub user_id: String,
    pub display_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
