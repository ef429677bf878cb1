use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::storage::{SqliteStorage, DEFAULT_STORAGE_KEY};

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_resolution_days() -> i64 {
    7
}

/// Upper bound on `estimated_resolution_days` (ten years).
pub const MAX_RESOLUTION_DAYS: i64 = 3650;

/// Report store settings, read from JSON. Every field has a default so `{}` is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// SQLite file backing the store; `None` keeps everything in memory.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub include_seed_reports: bool,
    /// Offset applied to `estimated_resolution` on creation.
    #[serde(default = "default_resolution_days")]
    pub estimated_resolution_days: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            db_path: None,
            include_seed_reports: true,
            estimated_resolution_days: default_resolution_days(),
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let cfg: StoreConfig = serde_json::from_str(text).map_err(|e| {
            AppError::new("CONFIG_PARSE_FAILED", "Failed to parse store config")
                .with_details(e.to_string())
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::new("CONFIG_READ_FAILED", "Failed to read store config")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage_key.trim().is_empty() {
            return Err(AppError::new("CONFIG_INVALID", "storage_key must not be empty"));
        }
        if !(0..=MAX_RESOLUTION_DAYS).contains(&self.estimated_resolution_days) {
            return Err(AppError::new(
                "CONFIG_INVALID",
                format!("estimated_resolution_days must be within 0..={MAX_RESOLUTION_DAYS}"),
            )
            .with_details(format!("value={}", self.estimated_resolution_days)));
        }
        Ok(())
    }

    pub fn open_storage(&self) -> Result<SqliteStorage, AppError> {
        match &self.db_path {
            Some(path) => SqliteStorage::open(path, self.storage_key.clone()),
            None => SqliteStorage::open_in_memory(self.storage_key.clone()),
        }
    }
}
