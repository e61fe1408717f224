use crate::clock::DayBoundary;
use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub day_boundary: DayBoundary,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, day_boundary: DayBoundary, data: AppData) -> Self {
        Self {
            data_path,
            day_boundary,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.day_boundary.today()
    }

    /// Runs `apply` on a copy under the lock and swaps the copy in only after
    /// it has been persisted. On any error the shared document is untouched.
    pub async fn mutate<T, F>(&self, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut AppData) -> Result<T, AppError>,
    {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let value = apply(&mut draft)?;
        persist_data(&self.data_path, &draft).await?;
        *data = draft;
        Ok(value)
    }
}
