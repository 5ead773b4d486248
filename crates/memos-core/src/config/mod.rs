//! Client configuration.
//!
//! Values are taken from explicit overrides (CLI flags) first, then from the
//! environment, then from built-in defaults.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{has_http_scheme, non_blank};

pub const SERVER_URL_ENV: &str = "MEMOS_SERVER_URL";
pub const ACCESS_TOKEN_ENV: &str = "MEMOS_ACCESS_TOKEN";
pub const TIMEOUT_SECS_ENV: &str = "MEMOS_TIMEOUT_SECS";

const DEFAULT_SERVER_URL: &str = "http://localhost:8081";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Connection settings for a Memos server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub server_url: String,
    /// Bearer token for authenticated endpoints
    pub access_token: Option<String>,
    /// Per-request timeout, also used to bound session hydration
    pub request_timeout: Duration,
    /// Extra attempts for idempotent reads
    pub read_retries: u32,
    /// Delay before the first retry; grows linearly per attempt
    pub retry_backoff: Duration,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            server_url: normalize_server_url(&server_url.into())?,
            access_token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            read_retries: DEFAULT_READ_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        })
    }

    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = non_blank(token);
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_read_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.read_retries = retries;
        self.retry_backoff = backoff;
        self
    }

    /// Build a config from explicit overrides and the process environment.
    pub fn from_env(server_url: Option<String>, access_token: Option<String>) -> Result<Self> {
        Self::from_sources(server_url, access_token, |key| std::env::var(key).ok())
    }

    /// Build a config from explicit overrides and an environment lookup.
    pub fn from_sources(
        server_url: Option<String>,
        access_token: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let server_url = non_blank(server_url)
            .or_else(|| non_blank(env(SERVER_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let access_token =
            non_blank(access_token).or_else(|| non_blank(env(ACCESS_TOKEN_ENV)));

        let config = Self::new(server_url)?.with_access_token(access_token);

        let Some(raw) = non_blank(env(TIMEOUT_SECS_ENV)) else {
            return Ok(config);
        };
        let seconds = raw.parse::<u64>().map_err(|_| {
            Error::Config(format!("{TIMEOUT_SECS_ENV} must be a whole number of seconds"))
        })?;
        if seconds == 0 {
            return Err(Error::Config(format!("{TIMEOUT_SECS_ENV} must be positive")));
        }
        Ok(config.with_request_timeout(Duration::from_secs(seconds)))
    }

    /// Join an API path onto the server URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.server_url, path.trim_start_matches('/'))
    }
}

fn normalize_server_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::Config("server URL must not be empty".to_string()));
    }
    if !has_http_scheme(&base) {
        return Err(Error::Config(
            "server URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}
