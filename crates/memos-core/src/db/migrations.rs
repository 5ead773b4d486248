//! Versioned schema for the preference database
//!
//! The applied version is kept in `PRAGMA user_version`. Each migration and
//! its version bump commit in one transaction.

use libsql::Connection;

use crate::error::{Error, Result};

struct Migration {
    version: i64,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: &["CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )"],
}];

/// Version the schema reaches once every migration has run.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Apply every migration newer than the stored version.
pub async fn run(conn: &Connection) -> Result<()> {
    let current = schema_version(conn).await?;
    let latest = latest_version();
    if current > latest {
        return Err(Error::Database(format!(
            "preference database is at version {current}, newer than supported version {latest}"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|migration| migration.version > current) {
        apply(conn, migration).await?;
        tracing::info!("Migrated preference database to version {}", migration.version);
    }
    Ok(())
}

pub async fn schema_version(conn: &Connection) -> Result<i64> {
    let mut rows = conn.query("PRAGMA user_version", ()).await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}

async fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    // Dropping an uncommitted transaction rolls it back.
    let tx = conn.transaction().await?;
    for statement in migration.statements {
        tx.execute(statement, ()).await?;
    }
    tx.execute(&format!("PRAGMA user_version = {}", migration.version), ())
        .await?;
    tx.commit().await?;
    Ok(())
}
