//! Crate-wide error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A remote call did not finish in time
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Local preference storage failure not raised by libSQL itself
    #[error("Database error: {0}")]
    Database(String),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a retry of the same idempotent request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(error) => error.is_timeout() || error.is_connect() || error.is_request(),
            Self::Api { status, .. } => *status >= 500,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let error = Error::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let error = Error::Api {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert!(!error.is_transient());
        assert!(!Error::InvalidInput("bad".to_string()).is_transient());
    }
}
