//! Local database layer for persisted client preferences

mod connection;
mod migrations;
mod preference_repository;

pub use connection::Database;
pub use preference_repository::LibSqlPreferenceStore;
