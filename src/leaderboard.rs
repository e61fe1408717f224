use crate::stats::UserAggregate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    #[default]
    Points,
    Streak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub user_id: String,
    pub stats: UserAggregate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: usize,
    pub user_id: String,
    pub stats: UserAggregate,
}

/// Orders standings best-first and numbers them 1..=N.
///
/// Every position gets its own rank, ties included. Ties on the chosen metric
/// fall back to the other metric and then to `user_id`, so the order never
/// depends on how the input was collected.
pub fn rank(mut standings: Vec<Standing>, by: RankBy) -> Vec<RankedEntry> {
    standings.sort_by(|a, b| compare(a, b, by));
    standings
        .into_iter()
        .enumerate()
        .map(|(index, standing)| RankedEntry {
            rank: index + 1,
            user_id: standing.user_id,
            stats: standing.stats,
        })
        .collect()
}

fn compare(a: &Standing, b: &Standing, by: RankBy) -> Ordering {
    let points = b.stats.total_points.cmp(&a.stats.total_points);
    let streak = b.stats.current_streak.cmp(&a.stats.current_streak);
    let metric = match by {
        RankBy::Points => points.then(streak),
        RankBy::Streak => streak.then(points),
    };
    metric.then_with(|| a.user_id.cmp(&b.user_id))
}
