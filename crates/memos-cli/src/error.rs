use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] memos_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Locale cannot be empty")]
    EmptyLocale,
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Nothing to update. Pass --locale and/or --appearance.")]
    NothingToUpdate,
    #[error("{failed} of {attempted} unused resources could not be deleted")]
    PartialCleanup { failed: usize, attempted: usize },
}
