//! Streak and XP arithmetic over a single user's log entries.
//!
//! Every surface that shows XP or a streak goes through [`aggregate`], so the
//! numbers on a profile, the dashboard and both leaderboards always agree.

use crate::models::{DailyPoint, LogEntry};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserAggregate {
    pub total_points: u64,
    pub current_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn from_points(total_points: u64) -> Self {
        match total_points {
            0..=500 => Self::Beginner,
            501..=1000 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }
}

/// Total points and current streak for one user's entries, in any order.
///
/// Duplicate dates each add their points but count once toward the streak.
pub fn aggregate<'a, I>(entries: I, today: NaiveDate) -> UserAggregate
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut total_points = 0u64;
    let mut dates = BTreeSet::new();
    for entry in entries {
        total_points = total_points.saturating_add(u64::from(entry.points_earned));
        dates.insert(entry.date);
    }

    UserAggregate {
        total_points,
        current_streak: current_streak(&dates, today),
    }
}

/// Length of the run of consecutive days ending at the latest logged day.
///
/// The run only counts while it is anchored: the latest day has to be today
/// or yesterday, otherwise the streak is broken and this returns 0.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(&latest) = dates.last() else {
        return 0;
    };
    if latest != today && Some(latest) != today.pred_opt() {
        return 0;
    }

    let mut streak = 0u32;
    let mut cursor = Some(latest);
    while let Some(day) = cursor.filter(|day| dates.contains(day)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

/// Points per day for the `days` calendar days ending at `today`, oldest first.
pub fn recent_days<'a, I>(entries: I, today: NaiveDate, days: u32) -> Vec<DailyPoint>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in entries {
        let slot = by_date.entry(entry.date).or_default();
        *slot = slot.saturating_add(u64::from(entry.points_earned));
    }

    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            DailyPoint {
                date,
                points: by_date.get(&date).copied().unwrap_or_default(),
            }
        })
        .collect()
}
