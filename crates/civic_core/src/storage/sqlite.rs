use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use super::{decode_reports, encode_reports, ReportStorage};
use crate::domain::Report;
use crate::error::AppError;

/// Report collection stored as one row of the `kv_store` table.
pub struct SqliteStorage {
    conn: Connection,
    key: String,
}

impl SqliteStorage {
    pub fn open(path: &Path, key: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            conn: crate::db::connect(Some(path))?,
            key: key.into(),
        })
    }

    pub fn open_in_memory(key: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            conn: crate::db::connect(None)?,
            key: key.into(),
        })
    }

    /// Raw stored text, bypassing decoding.
    pub fn read_raw(&self) -> Result<Option<String>, AppError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [&self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| {
                AppError::persistence("Failed to read stored reports").with_details(e.to_string())
            })
    }

    pub fn write_raw(&self, value: &str) -> Result<(), AppError> {
        self.conn
            .execute(
                r#"
        INSERT INTO kv_store(key, value, updated_at)
        VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
                [self.key.as_str(), value],
            )
            .map_err(|e| {
                AppError::persistence("Failed to write stored reports").with_details(e.to_string())
            })?;
        Ok(())
    }
}

impl ReportStorage for SqliteStorage {
    fn load(&self) -> Result<Vec<Report>, AppError> {
        let raw = self.read_raw()?;
        Ok(decode_reports(&self.key, raw.as_deref()))
    }

    fn save(&mut self, reports: &[Report]) -> Result<(), AppError> {
        let encoded = encode_reports(reports)?;
        self.write_raw(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_round_trip_and_upsert() {
        let mut storage = SqliteStorage::open_in_memory("citizenReports").expect("open");
        assert!(storage.load().unwrap().is_empty());

        let seeds = crate::demo::seed_reports();
        storage.save(&seeds).unwrap();
        storage.save(&seeds[..2]).unwrap();
        assert_eq!(storage.load().unwrap(), seeds[..2].to_vec());

        let rows: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn malformed_row_loads_empty() {
        let storage = SqliteStorage::open_in_memory("citizenReports").expect("open");
        storage.write_raw("[{\"broken\":").unwrap();
        assert!(storage.load().unwrap().is_empty());
    }
}
