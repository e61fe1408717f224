use chrono::{FixedOffset, Local, NaiveDate, Utc};
use std::{fmt, str::FromStr};

/// Which timezone decides where one calendar day ends and the next begins.
///
/// Streaks are anchored at "today" or "yesterday", so two servers with
/// different boundaries can disagree about the same rows. The boundary is
/// configured once per process and every aggregate is evaluated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl DayBoundary {
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::Local => Local::now().date_naive(),
            Self::Utc => Utc::now().date_naive(),
            Self::Fixed(offset) => Utc::now().with_timezone(offset).date_naive(),
        }
    }
}

impl FromStr for DayBoundary {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" | "z" => Ok(Self::Utc),
            _ => value.parse::<FixedOffset>().map(Self::Fixed).map_err(|err| {
                format!("expected 'local', 'utc' or an offset like +05:30, got '{value}': {err}")
            }),
        }
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("utc"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
