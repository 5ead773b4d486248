//! libSQL-backed preference store

use std::path::Path;

use crate::error::Result;
use crate::models::{Appearance, Locale, PreferencePatch, StoredSession};
use crate::preferences::PreferenceStore;

use super::Database;

const LOCALE_KEY: &str = "locale";
const APPEARANCE_KEY: &str = "appearance";
const SESSION_USERNAME_KEY: &str = "session.username";

/// Preference store persisted in the local `settings` table.
pub struct LibSqlPreferenceStore {
    db: Database,
}

impl LibSqlPreferenceStore {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path).await?))
    }

    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    /// The signed-in user remembered from a previous run, if any.
    pub async fn load_session(&self) -> Result<Option<StoredSession>> {
        Ok(self
            .get_setting(SESSION_USERNAME_KEY)
            .await?
            .and_then(StoredSession::new))
    }

    pub async fn save_session(&self, session: &StoredSession) -> Result<()> {
        self.set_setting(SESSION_USERNAME_KEY, &session.username)
            .await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.db
            .connection()
            .execute("DELETE FROM settings WHERE key = ?", [SESSION_USERNAME_KEY])
            .await?;
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .db
            .connection()
            .query("SELECT value FROM settings WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = strftime('%s', 'now')",
                [key, value],
            )
            .await?;
        tracing::debug!("Persisted preference {}={}", key, value);
        Ok(())
    }
}

impl PreferenceStore for LibSqlPreferenceStore {
    async fn load(&self) -> Result<PreferencePatch> {
        let locale = self
            .get_setting(LOCALE_KEY)
            .await?
            .and_then(|value| Locale::parse(&value));

        let appearance = match self.get_setting(APPEARANCE_KEY).await? {
            Some(value) => match value.parse::<Appearance>() {
                Ok(appearance) => Some(appearance),
                Err(error) => {
                    tracing::warn!("Ignoring stored appearance: {}", error);
                    None
                }
            },
            None => None,
        };

        Ok(PreferencePatch { locale, appearance })
    }

    async fn set(&self, patch: PreferencePatch) -> Result<()> {
        if let Some(locale) = &patch.locale {
            self.set_setting(LOCALE_KEY, locale.as_str()).await?;
        }
        if let Some(appearance) = patch.appearance {
            self.set_setting(APPEARANCE_KEY, appearance.as_str()).await?;
        }
        Ok(())
    }
}
