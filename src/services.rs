//! Reads and writes against the in-memory [`AppData`].
//!
//! Callers hold the state lock for the duration of a call and persist the
//! document afterwards when something changed. Nothing here touches the clock
//! for calendar decisions; "today" is always passed in.

use crate::errors::AppError;
use crate::leaderboard::{self, RankBy, RankedEntry, Standing};
use crate::models::{
    AppData, ChatMessage, ChatMessageView, CompleteGoalResponse, CreateGoalRequest, FriendStatus,
    Friendship, Goal, LeaderboardRow, LogEntry, PendingRequest, Profile, ProfileRequest,
    UpdateGoalRequest, UserSummary,
};
use crate::stats::{self, Level, UserAggregate};
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use uuid::Uuid;

pub const DAILY_LOG_POINTS: u32 = 10;
pub const DEFAULT_GOAL_REWARD: u32 = 25;
pub const MAX_GOAL_REWARD: u32 = 1000;
pub const CHAT_HISTORY_LIMIT: usize = 100;
pub const MAX_MESSAGE_CHARS: usize = 2000;
const SUMMARY_DAYS: u32 = 7;

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// User ids arrive from paths and bodies; surrounding whitespace is not part of the id.
pub fn normalize_user_id(user_id: &str) -> &str {
    user_id.trim()
}

fn require_user_id(user_id: &str) -> Result<&str, AppError> {
    let user_id = normalize_user_id(user_id);
    if user_id.is_empty() {
        return Err(AppError::bad_request("user_id must not be empty"));
    }
    Ok(user_id)
}

fn check_reward(points_reward: u32) -> Result<u32, AppError> {
    if points_reward == 0 || points_reward > MAX_GOAL_REWARD {
        return Err(AppError::bad_request(format!(
            "points_reward must be between 1 and {MAX_GOAL_REWARD}"
        )));
    }
    Ok(points_reward)
}

/// Records today's activity. Returns the entry and whether it was newly created.
///
/// Logging twice on the same day only replaces the description.
pub fn log_progress(
    data: &mut AppData,
    user_id: &str,
    today: NaiveDate,
    description: Option<String>,
) -> Result<(LogEntry, bool), AppError> {
    let user_id = require_user_id(user_id)?;
    let description = clean(description);

    if let Some(existing) = data
        .logs
        .iter_mut()
        .find(|entry| entry.user_id == user_id && entry.date == today)
    {
        existing.description = description;
        debug!(user_id, %today, "updated existing log entry");
        return Ok((existing.clone(), false));
    }

    let entry = LogEntry {
        user_id: user_id.to_string(),
        date: today,
        points_earned: DAILY_LOG_POINTS,
        description,
    };
    data.logs.push(entry.clone());
    info!(user_id, %today, points = DAILY_LOG_POINTS, "logged progress");
    Ok((entry, true))
}

pub fn edit_log_description(
    data: &mut AppData,
    user_id: &str,
    date: NaiveDate,
    description: Option<String>,
) -> Result<LogEntry, AppError> {
    let user_id = require_user_id(user_id)?;
    let entry = data
        .logs
        .iter_mut()
        .find(|entry| entry.user_id == user_id && entry.date == date)
        .ok_or(AppError::NotFound("log entry"))?;
    entry.description = clean(description);
    Ok(entry.clone())
}

pub fn list_logs(data: &AppData, user_id: &str) -> Vec<LogEntry> {
    let user_id = normalize_user_id(user_id);
    let mut logs: Vec<_> = data.logs_for(user_id).cloned().collect();
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    logs
}

pub fn create_goal(
    data: &mut AppData,
    user_id: &str,
    request: CreateGoalRequest,
) -> Result<Goal, AppError> {
    let user_id = require_user_id(user_id)?;
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    let points_reward = check_reward(request.points_reward.unwrap_or(DEFAULT_GOAL_REWARD))?;

    let now = Utc::now();
    let goal = Goal {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: clean(request.description),
        target_date: request.target_date,
        points_reward,
        completed: false,
        rewarded: false,
        created_at: now,
        updated_at: now,
    };
    data.goals.push(goal.clone());
    info!(user_id, goal_id = %goal.id, "created goal");
    Ok(goal)
}

/// Edits a goal in place. Marking it completed here awards nothing.
pub fn update_goal(
    data: &mut AppData,
    goal_id: Uuid,
    request: UpdateGoalRequest,
) -> Result<Goal, AppError> {
    let goal = data
        .goals
        .iter_mut()
        .find(|goal| goal.id == goal_id)
        .ok_or(AppError::NotFound("goal"))?;

    let title = match request.title {
        Some(title) if title.trim().is_empty() => {
            return Err(AppError::bad_request("title must not be empty"));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };
    let points_reward = request.points_reward.map(check_reward).transpose()?;

    if let Some(title) = title {
        goal.title = title;
    }
    if request.description.is_some() {
        goal.description = clean(request.description);
    }
    if let Some(target_date) = request.target_date {
        goal.target_date = Some(target_date);
    }
    if let Some(points_reward) = points_reward {
        goal.points_reward = points_reward;
    }
    if let Some(completed) = request.completed {
        goal.completed = completed;
    }
    goal.updated_at = Utc::now();
    Ok(goal.clone())
}

/// Completes a goal and credits its reward to the owner's entry for `today`.
///
/// A goal pays out at most once, even if it is reopened and completed again.
pub fn complete_goal(
    data: &mut AppData,
    goal_id: Uuid,
    today: NaiveDate,
) -> Result<CompleteGoalResponse, AppError> {
    let goal = data
        .goals
        .iter_mut()
        .find(|goal| goal.id == goal_id)
        .ok_or(AppError::NotFound("goal"))?;
    if goal.completed {
        return Err(AppError::conflict("goal is already completed"));
    }
    if goal.rewarded {
        return Err(AppError::conflict("goal reward was already credited"));
    }
    goal.completed = true;
    goal.rewarded = true;
    goal.updated_at = Utc::now();
    let goal = goal.clone();

    let entry = match data
        .logs
        .iter_mut()
        .find(|entry| entry.user_id == goal.user_id && entry.date == today)
    {
        Some(existing) => {
            existing.points_earned = existing.points_earned.saturating_add(goal.points_reward);
            existing.clone()
        }
        None => {
            let entry = LogEntry {
                user_id: goal.user_id.clone(),
                date: today,
                points_earned: goal.points_reward,
                description: Some(format!("Completed goal: {}", goal.title)),
            };
            data.logs.push(entry.clone());
            entry
        }
    };

    info!(user_id = %goal.user_id, goal_id = %goal.id, points = goal.points_reward, "completed goal");
    Ok(CompleteGoalResponse { goal, entry })
}

/// Open goals first, then completed ones, oldest first within each group.
pub fn list_goals(data: &AppData, user_id: &str) -> Vec<Goal> {
    let user_id = normalize_user_id(user_id);
    let mut goals: Vec<_> = data
        .goals
        .iter()
        .filter(|goal| goal.user_id == user_id)
        .cloned()
        .collect();
    goals.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then(a.created_at.cmp(&b.created_at))
    });
    goals
}

pub fn upsert_profile(
    data: &mut AppData,
    user_id: &str,
    request: ProfileRequest,
) -> Result<Profile, AppError> {
    let user_id = require_user_id(user_id)?;
    let profile = Profile {
        username: clean(request.username),
        display_name: clean(request.display_name),
        bio: clean(request.bio),
        avatar_url: clean(request.avatar_url),
        github_url: clean(request.github_url),
        linkedin_url: clean(request.linkedin_url),
        instagram_url: clean(request.instagram_url),
        updated_at: Some(Utc::now()),
    };
    data.profiles.insert(user_id.to_string(), profile.clone());
    Ok(profile)
}

pub fn get_profile(data: &AppData, user_id: &str) -> Result<Profile, AppError> {
    data.profiles
        .get(normalize_user_id(user_id))
        .cloned()
        .ok_or(AppError::NotFound("profile"))
}

pub fn send_friend_request(
    data: &mut AppData,
    user_id: &str,
    friend_user_id: &str,
) -> Result<Friendship, AppError> {
    let user_id = require_user_id(user_id)?;
    let friend_user_id = require_user_id(friend_user_id)?;
    if user_id == friend_user_id {
        return Err(AppError::bad_request("cannot send a friend request to yourself"));
    }
    if data
        .friendships
        .iter()
        .any(|friendship| friendship.links(user_id, friend_user_id))
    {
        return Err(AppError::conflict("a friend request already links these users"));
    }

    let friendship = Friendship {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        friend_user_id: friend_user_id.to_string(),
        status: FriendStatus::Pending,
        created_at: Utc::now(),
    };
    data.friendships.push(friendship.clone());
    Ok(friendship)
}

pub fn accept_friend_request(data: &mut AppData, request_id: Uuid) -> Result<Friendship, AppError> {
    let friendship = data
        .friendships
        .iter_mut()
        .find(|friendship| friendship.id == request_id)
        .ok_or(AppError::NotFound("friend request"))?;
    if friendship.status == FriendStatus::Accepted {
        return Err(AppError::conflict("friend request already accepted"));
    }
    friendship.status = FriendStatus::Accepted;
    Ok(friendship.clone())
}

pub fn decline_friend_request(data: &mut AppData, request_id: Uuid) -> Result<(), AppError> {
    let before = data.friendships.len();
    data.friendships.retain(|friendship| friendship.id != request_id);
    if data.friendships.len() == before {
        return Err(AppError::NotFound("friend request"));
    }
    Ok(())
}

pub fn friend_status(data: &AppData, user_id: &str, other_id: &str) -> FriendStatus {
    let (user_id, other_id) = (normalize_user_id(user_id), normalize_user_id(other_id));
    data.friendships
        .iter()
        .find(|friendship| friendship.links(user_id, other_id))
        .map(|friendship| friendship.status)
        .unwrap_or(FriendStatus::None)
}

pub fn pending_requests(data: &AppData, user_id: &str) -> Vec<PendingRequest> {
    let user_id = normalize_user_id(user_id);
    let mut pending: Vec<_> = data
        .friendships
        .iter()
        .filter(|f| f.friend_user_id == user_id && f.status == FriendStatus::Pending)
        .map(|f| PendingRequest {
            id: f.id,
            display_name: data.display_name(&f.user_id),
            user_id: f.user_id.clone(),
            created_at: f.created_at,
        })
        .collect();
    pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    pending
}

pub fn post_message(
    data: &mut AppData,
    user_id: &str,
    message: &str,
) -> Result<ChatMessageView, AppError> {
    let user_id = require_user_id(user_id)?;
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::bad_request(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let stored = ChatMessage {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        message: message.to_string(),
        created_at: Utc::now(),
    };
    data.messages.push(stored.clone());
    Ok(message_view(data, stored))
}

/// The latest messages, oldest first.
pub fn chat_history(data: &AppData) -> Vec<ChatMessageView> {
    let mut messages = data.messages.clone();
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let skip = messages.len().saturating_sub(CHAT_HISTORY_LIMIT);
    messages
        .into_iter()
        .skip(skip)
        .map(|message| message_view(data, message))
        .collect()
}

fn message_view(data: &AppData, message: ChatMessage) -> ChatMessageView {
    ChatMessageView {
        id: message.id,
        display_name: data.display_name(&message.user_id),
        user_id: message.user_id,
        message: message.message,
        created_at: message.created_at,
    }
}

pub fn aggregate_user(data: &AppData, user_id: &str, today: NaiveDate) -> UserAggregate {
    stats::aggregate(data.logs_for(normalize_user_id(user_id)), today)
}

/// Users who can appear on a leaderboard: anyone with a profile or a log entry.
pub fn known_users(data: &AppData) -> BTreeSet<String> {
    data.profiles
        .keys()
        .cloned()
        .chain(data.logs.iter().map(|entry| entry.user_id.clone()))
        .collect()
}

fn standings<I>(data: &AppData, users: I, today: NaiveDate) -> Vec<Standing>
where
    I: IntoIterator<Item = String>,
{
    let mut by_user: BTreeMap<&str, Vec<&LogEntry>> = BTreeMap::new();
    for entry in &data.logs {
        by_user.entry(entry.user_id.as_str()).or_default().push(entry);
    }

    users
        .into_iter()
        .map(|user_id| {
            let entries = by_user.get(user_id.as_str()).map(Vec::as_slice).unwrap_or_default();
            Standing {
                stats: stats::aggregate(entries.iter().copied(), today),
                user_id,
            }
        })
        .collect()
}

fn to_rows(data: &AppData, ranked: Vec<RankedEntry>) -> Vec<LeaderboardRow> {
    ranked
        .into_iter()
        .map(|entry| LeaderboardRow {
            rank: entry.rank,
            display_name: data.display_name(&entry.user_id),
            user_id: entry.user_id,
            total_points: entry.stats.total_points,
            current_streak: entry.stats.current_streak,
        })
        .collect()
}

pub fn global_leaderboard(
    data: &AppData,
    today: NaiveDate,
    by: RankBy,
    limit: Option<usize>,
) -> Vec<LeaderboardRow> {
    let ranked = leaderboard::rank(standings(data, known_users(data), today), by);
    let mut rows = to_rows(data, ranked);
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// The user and their accepted friends, ranked by points.
pub fn friends_leaderboard(data: &AppData, user_id: &str, today: NaiveDate) -> Vec<LeaderboardRow> {
    let user_id = normalize_user_id(user_id);
    let mut users: BTreeSet<String> = data
        .friendships
        .iter()
        .filter(|friendship| friendship.status == FriendStatus::Accepted)
        .filter_map(|friendship| friendship.other(user_id))
        .map(str::to_string)
        .collect();
    users.insert(user_id.to_string());

    to_rows(data, leaderboard::rank(standings(data, users, today), RankBy::Points))
}

pub fn user_summary(data: &AppData, user_id: &str, today: NaiveDate) -> UserSummary {
    let user_id = normalize_user_id(user_id);
    let aggregate = aggregate_user(data, user_id, today);
    let rank = leaderboard::rank(standings(data, known_users(data), today), RankBy::Points)
        .into_iter()
        .find(|entry| entry.user_id == user_id)
        .map(|entry| entry.rank);
    let (completed_goals, active_goals) = data
        .goals
        .iter()
        .filter(|goal| goal.user_id == user_id)
        .fold((0, 0), |(done, open), goal| {
            if goal.completed {
                (done + 1, open)
            } else {
                (done, open + 1)
            }
        });

    UserSummary {
        user_id: user_id.to_string(),
        display_name: data.display_name(user_id),
        total_points: aggregate.total_points,
        current_streak: aggregate.current_streak,
        level: Level::from_points(aggregate.total_points),
        rank,
        active_goals,
        completed_goals,
        logged_today: data.logs_for(user_id).any(|entry| entry.date == today),
        last_7_days: stats::recent_days(data.logs_for(user_id), today, SUMMARY_DAYS),
    }
}
