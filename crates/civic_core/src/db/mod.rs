//! SQLite connection for the key-value report backend.
//!
//! The schema version lives in `PRAGMA user_version`. Entry `n` of `SCHEMA_STEPS`
//! upgrades a database at version `n` to version `n + 1`.

use std::path::Path;

use rusqlite::Connection;

use crate::error::AppError;

const SCHEMA_STEPS: &[&str] = &[include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../migrations/0001_report_kv.sql"
))];

pub const SCHEMA_VERSION: i64 = SCHEMA_STEPS.len() as i64;

/// Open the report database (file-backed, or in memory for `None`) at the current schema.
pub fn connect(path: Option<&Path>) -> Result<Connection, AppError> {
    let opened = match path {
        Some(p) => Connection::open(p),
        None => Connection::open_in_memory(),
    };
    let mut conn = opened.map_err(|e| {
        let target = path.map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
        AppError::new("DB_OPEN_FAILED", "Failed to open report database")
            .with_details(format!("path={target}; err={e}"))
    })?;
    upgrade(&mut conn)?;
    Ok(conn)
}

pub fn schema_version(conn: &Connection) -> Result<i64, AppError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| {
            AppError::new("DB_MIGRATION_FAILED", "Failed to read schema version")
                .with_details(e.to_string())
        })
}

/// Bring the database up to `SCHEMA_VERSION`, one transaction per step.
pub fn upgrade(conn: &mut Connection) -> Result<i64, AppError> {
    let current = schema_version(conn)?;
    let start = usize::try_from(current)
        .ok()
        .filter(|v| *v <= SCHEMA_STEPS.len())
        .ok_or_else(|| {
            AppError::new("DB_SCHEMA_UNSUPPORTED", "Report database schema is not supported")
                .with_details(format!("found={current}; supported={SCHEMA_VERSION}"))
        })?;

    for (idx, sql) in SCHEMA_STEPS.iter().enumerate().skip(start) {
        let target = idx as i64 + 1;
        let tx = conn.transaction().map_err(|e| {
            AppError::new("DB_TX_FAILED", "Failed to start schema upgrade")
                .with_details(e.to_string())
        })?;
        tx.execute_batch(sql).map_err(|e| {
            AppError::new("DB_MIGRATION_FAILED", "Schema upgrade failed")
                .with_details(format!("version={target}; err={e}"))
        })?;
        tx.pragma_update(None, "user_version", target).map_err(|e| {
            AppError::new("DB_MIGRATION_FAILED", "Failed to record schema version")
                .with_details(format!("version={target}; err={e}"))
        })?;
        tx.commit().map_err(|e| {
            AppError::new("DB_TX_FAILED", "Failed to commit schema upgrade")
                .with_details(e.to_string())
        })?;
        log::debug!("report database upgraded to schema version {target}");
    }

    Ok(SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::OptionalExtension;

    #[test]
    fn fresh_database_gets_kv_table() {
        let conn = connect(None).expect("connect");
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let name: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='kv_store'",
                [],
                |row| row.get(0),
            )
            .optional()
            .unwrap();
        assert_eq!(name.as_deref(), Some("kv_store"));
    }

    #[test]
    fn upgrade_is_idempotent() {
        let mut conn = connect(None).expect("connect");
        conn.execute(
            "INSERT INTO kv_store(key, value, updated_at) VALUES ('k', '[]', 'now')",
            [],
        )
        .unwrap();
        assert_eq!(upgrade(&mut conn).unwrap(), SCHEMA_VERSION);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn newer_schema_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        let err = upgrade(&mut conn).unwrap_err();
        assert_eq!(err.code, "DB_SCHEMA_UNSUPPORTED");
    }

    #[test]
    fn file_database_keeps_version_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.sqlite");
        drop(connect(Some(&path)).expect("first"));
        let conn = connect(Some(&path)).expect("second");
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
