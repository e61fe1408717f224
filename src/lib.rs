pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod services;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
