//! memos-core - Core library for the Memos client
//!
//! This crate holds the client-side logic shared by every Memos front-end:
//! the reactive state container, the preference and environment
//! synchronizer, resource grouping and the unused-resource cleanup flow.
//! The host document, the confirmation surface and the OS color-scheme
//! signal belong to the front-end and are consumed here through traits.

pub mod api;
pub mod config;
pub mod db;
pub mod dialog;
pub mod document;
pub mod error;
pub mod i18n;
pub mod models;
pub mod preferences;
pub mod resources;
pub mod signal;
pub mod state;
pub mod sync;
pub mod theme;
pub mod util;

pub use error::{Error, Result};
pub use models::{
    Appearance, Locale, Preferences, Resource, ResourceId, StoredSession, SystemStatus, User,
};
pub use state::{AppPhase, AppStore};
pub use theme::ResolvedMode;
