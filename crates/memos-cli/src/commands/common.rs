use std::path::{Path, PathBuf};
use std::rc::Rc;

use memos_core::api::MemosApiClient;
use memos_core::config::ClientConfig;
use memos_core::db::LibSqlPreferenceStore;
use memos_core::document::HeadlessDocument;
use memos_core::i18n::Catalog;
use memos_core::models::PreferencePatch;
use memos_core::preferences::{MemoryPreferenceStore, PreferenceStore};
use memos_core::signal::{ColorSchemeSource, ManualColorScheme, SystemColorScheme};
use memos_core::sync::Synchronizer;
use memos_core::{AppStore, Preferences, Resource, StoredSession};

use crate::cli::Cli;
use crate::error::CliError;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub server: Option<String>,
    pub token: Option<String>,
    pub db_path: Option<PathBuf>,
    pub ephemeral: bool,
    pub prefers_dark: Option<bool>,
}

impl From<&Cli> for GlobalOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            server: cli.server.clone(),
            token: cli.token.clone(),
            db_path: cli.db_path.clone(),
            ephemeral: cli.ephemeral,
            prefers_dark: cli.prefers_dark,
        }
    }
}

impl GlobalOptions {
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        Ok(ClientConfig::from_env(
            self.server.clone(),
            self.token.clone(),
        )?)
    }

    pub fn api_client(&self) -> Result<MemosApiClient, CliError> {
        Ok(MemosApiClient::new(self.client_config()?)?)
    }

    pub fn color_scheme(&self) -> Rc<dyn ColorSchemeSource> {
        match self.prefers_dark {
            Some(prefers_dark) => Rc::new(ManualColorScheme::new(prefers_dark)),
            None => Rc::new(SystemColorScheme::default()),
        }
    }

    pub async fn open_preferences(&self) -> Result<CliPreferences, CliError> {
        if self.ephemeral {
            return Ok(CliPreferences::Ephemeral(MemoryPreferenceStore::default()));
        }
        let path = resolve_db_path(self.db_path.clone());
        open_persistent_preferences(&path).await
    }
}

/// Preference store chosen by `--ephemeral`.
pub enum CliPreferences {
    Persistent(LibSqlPreferenceStore),
    Ephemeral(MemoryPreferenceStore),
}

impl CliPreferences {
    pub async fn load_session(&self) -> Result<Option<StoredSession>, CliError> {
        match self {
            Self::Persistent(store) => Ok(store.load_session().await?),
            Self::Ephemeral(_) => Ok(None),
        }
    }

    pub async fn save_session(&self, session: &StoredSession) -> Result<(), CliError> {
        match self {
            Self::Persistent(store) => Ok(store.save_session(session).await?),
            Self::Ephemeral(_) => {
                tracing::warn!("Session marker is not kept with --ephemeral");
                Ok(())
            }
        }
    }

    pub async fn clear_session(&self) -> Result<(), CliError> {
        match self {
            Self::Persistent(store) => Ok(store.clear_session().await?),
            Self::Ephemeral(_) => Ok(()),
        }
    }
}

impl PreferenceStore for CliPreferences {
    async fn load(&self) -> memos_core::Result<PreferencePatch> {
        match self {
            Self::Persistent(store) => store.load().await,
            Self::Ephemeral(store) => store.load().await,
        }
    }

    async fn set(&self, patch: PreferencePatch) -> memos_core::Result<()> {
        match self {
            Self::Persistent(store) => store.set(patch).await,
            Self::Ephemeral(store) => store.set(patch).await,
        }
    }
}

pub type CliSynchronizer = Synchronizer<HeadlessDocument, CliPreferences, Catalog>;

/// Store, document and synchronizer wired together for one command.
pub struct ClientSession {
    pub store: AppStore,
    pub document: Rc<HeadlessDocument>,
    pub preferences: Rc<CliPreferences>,
    pub catalog: Rc<Catalog>,
    pub sync: Rc<CliSynchronizer>,
}

impl ClientSession {
    /// Seed the store from stored preferences, filling gaps from
    /// `server_defaults`.
    pub async fn open(
        options: &GlobalOptions,
        server_defaults: &PreferencePatch,
    ) -> Result<Self, CliError> {
        let preferences = Rc::new(options.open_preferences().await?);
        let stored = preferences.load().await?;
        let initial = Preferences::resolve(&stored, server_defaults);

        let store = AppStore::new(initial.clone());
        let document = Rc::new(HeadlessDocument::new("/"));
        let catalog = Rc::new(Catalog::new(initial.locale));
        let sync = Rc::new(Synchronizer::new(
            store.clone(),
            Rc::clone(&document),
            Rc::clone(&preferences),
            Rc::clone(&catalog),
            options.color_scheme(),
        ));

        Ok(Self {
            store,
            document,
            preferences,
            catalog,
            sync,
        })
    }
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path.unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("memos")
        .join("preferences.db")
}

pub async fn open_persistent_preferences(path: &Path) -> Result<CliPreferences, CliError> {
    Ok(CliPreferences::Persistent(
        LibSqlPreferenceStore::open(path).await?,
    ))
}

/// Stored catalog locale, without contacting the server.
pub async fn load_catalog(options: &GlobalOptions) -> Result<Catalog, CliError> {
    let preferences = options.open_preferences().await?.get().await?;
    Ok(Catalog::new(preferences.locale))
}

pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

pub fn format_resource_line(resource: &Resource) -> String {
    let kind = if resource.mime_type.is_empty() {
        "-"
    } else {
        resource.mime_type.as_str()
    };
    let line = format!(
        "#{:<5} {}  {:<28} {:<18} {}",
        resource.id.0,
        resource.created_ts.format("%Y-%m-%d"),
        resource.filename,
        kind,
        format_size(resource.size)
    );
    match resource.linked_memo() {
        Some(memo) => format!("{line}  (#{memo})"),
        None => line,
    }
}
