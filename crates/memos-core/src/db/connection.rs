//! libSQL connection for the local preference database

use std::path::Path;

use libsql::{Builder, Connection, Database as LibSqlDatabase};

use super::migrations;
use crate::error::Result;

const MEMORY_LOCATION: &str = ":memory:";

const FILE_PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode = WAL",
    "PRAGMA synchronous = NORMAL",
    "PRAGMA busy_timeout = 5000",
];

/// An open, migrated preference database.
pub struct Database {
    // `conn` is only valid while the handle is alive
    _handle: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open the database file at `path`, creating it and its parent
    /// directories when missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let database = Self::connect(&path.to_string_lossy()).await?;
        tracing::debug!("Opened preference database at {}", path.display());
        Ok(database)
    }

    pub async fn open_in_memory() -> Result<Self> {
        Self::connect(MEMORY_LOCATION).await
    }

    async fn connect(location: &str) -> Result<Self> {
        let handle = Builder::new_local(location).build().await?;
        let conn = handle.connect()?;

        if location != MEMORY_LOCATION {
            apply_pragmas(&conn).await;
        }
        migrations::run(&conn).await?;

        Ok(Self {
            _handle: handle,
            conn,
        })
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

async fn apply_pragmas(conn: &Connection) {
    for pragma in FILE_PRAGMAS {
        // Some pragmas answer with a row, so they go through `query`.
        if let Err(error) = conn.query(pragma, ()).await {
            tracing::warn!("Failed to apply `{}`: {}", pragma, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_database_is_migrated() {
        let db = Database::open_in_memory().await.unwrap();
        let version = migrations::schema_version(db.connection()).await.unwrap();
        assert_eq!(version, migrations::latest_version());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn file_database_keeps_rows_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.db");

        {
            let db = Database::open(&path).await.unwrap();
            db.connection()
                .execute(
                    "INSERT INTO settings (key, value) VALUES ('appearance', 'dark')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = Database::open(&path).await.unwrap();
        let mut rows = db
            .connection()
            .query("SELECT value FROM settings WHERE key = 'appearance'", ())
            .await
            .unwrap();
        let value: String = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(value, "dark");
        assert!(path.exists());
    }
}
