use crate::clock::DayBoundary;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("invalid {key} value '{value}': {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub day_boundary: DayBoundary,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", "8080")?,
            data_path: try_load("APP_DATA_PATH", "data/state.json")?,
            day_boundary: try_load("STREAKHUB_DAY_BOUNDARY", "local")?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match value.parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(err) => Err(ConfigError {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}
