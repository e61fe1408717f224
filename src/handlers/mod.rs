pub mod goals;
pub mod leaderboard;
pub mod logs;
pub mod social;
