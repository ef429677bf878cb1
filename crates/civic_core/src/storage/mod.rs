//! Durable key-value persistence for the report collection.
//!
//! The whole collection lives under one key as a JSON array. Loading is permissive: a
//! missing key or content that does not decode is treated as an empty collection.
//! Only failures of the backing store itself surface as `PERSISTENCE_FAILED`.

pub mod sqlite;

use std::collections::BTreeMap;

use crate::domain::Report;
use crate::error::AppError;

pub use sqlite::SqliteStorage;

pub const DEFAULT_STORAGE_KEY: &str = "citizenReports";

pub trait ReportStorage {
    fn load(&self) -> Result<Vec<Report>, AppError>;
    fn save(&mut self, reports: &[Report]) -> Result<(), AppError>;
}

/// Decode a stored JSON array, falling back to empty on absent or malformed content.
pub fn decode_reports(key: &str, raw: Option<&str>) -> Vec<Report> {
    let Some(raw) = raw else {
        log::debug!("storage key {key} not present; starting empty");
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Report>>(raw) {
        Ok(reports) => reports,
        Err(e) => {
            log::warn!("ignoring malformed report data under key {key}: {e}");
            Vec::new()
        }
    }
}

pub fn encode_reports(reports: &[Report]) -> Result<String, AppError> {
    serde_json::to_string(reports).map_err(|e| {
        AppError::persistence("Failed to encode reports").with_details(e.to_string())
    })
}

/// In-process key-value store holding raw JSON text per key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    key: String,
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Seed raw content under the storage key (used to simulate previously stored data).
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.entries.insert(self.key.clone(), raw.into());
        self
    }

    pub fn raw(&self) -> Option<&str> {
        self.entries.get(&self.key).map(String::as_str)
    }
}

impl ReportStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Report>, AppError> {
        Ok(decode_reports(&self.key, self.raw()))
    }

    fn save(&mut self, reports: &[Report]) -> Result<(), AppError> {
        let encoded = encode_reports(reports)?;
        self.entries.insert(self.key.clone(), encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_empty() {
        let storage = MemoryStorage::new(DEFAULT_STORAGE_KEY);
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_content_loads_empty() {
        let storage = MemoryStorage::new(DEFAULT_STORAGE_KEY).with_raw("{not json");
        assert!(storage.load().unwrap().is_empty());

        let wrong_shape = MemoryStorage::new(DEFAULT_STORAGE_KEY).with_raw(r#"{"id":"1"}"#);
        assert!(wrong_shape.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let mut storage = MemoryStorage::new("k");
        let reports = crate::demo::seed_reports();
        storage.save(&reports).unwrap();
        assert_eq!(storage.load().unwrap(), reports);
    }
}
