//! HTTP implementation of the Memos API traits

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{Resource, ResourceId, SystemStatus, User};
use crate::util::error_excerpt;

use super::{parse_resource_list, parse_system_status, parse_user, ResourceService, StatusService};

const STATUS_PATH: &str = "/api/v1/status";
const RESOURCES_PATH: &str = "/api/v2/resources";
const USERS_PATH: &str = "/api/v2/users";

/// HTTP client for a Memos server.
#[derive(Debug, Clone)]
pub struct MemosApiClient {
    config: ClientConfig,
    client: Client,
}

impl MemosApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET `path`, retrying transient failures. Returns `None` on 404.
    async fn get_text(&self, path: &str) -> Result<Option<String>> {
        let url = self.config.endpoint(path);
        let mut attempt = 0;

        loop {
            match self.get_once(&url).await {
                Err(error) if error.is_transient() && attempt < self.config.read_retries => {
                    attempt += 1;
                    let delay = retry_delay(self.config.retry_backoff, attempt);
                    tracing::warn!(
                        "GET {} failed ({}), retrying in {:?} (attempt {}/{})",
                        url,
                        error,
                        delay,
                        attempt,
                        self.config.read_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<Option<String>> {
        let response = self.authorize(self.client.get(url)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_excerpt(&body),
            });
        }
        Ok(Some(body))
    }
}

fn retry_delay(backoff: Duration, attempt: u32) -> Duration {
    backoff.saturating_mul(attempt)
}

impl ResourceService for MemosApiClient {
    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let body = self
            .get_text(RESOURCES_PATH)
            .await?
            .ok_or_else(|| Error::NotFound(RESOURCES_PATH.to_string()))?;
        let resources = parse_resource_list(&body)?;
        tracing::debug!("Fetched {} resources", resources.len());
        Ok(resources)
    }

    async fn delete_resource(&self, id: ResourceId) -> Result<()> {
        let url = self.config.endpoint(&format!("{RESOURCES_PATH}/{id}"));
        let response = self.authorize(self.client.delete(&url)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Resource {} was already gone", id);
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_excerpt(&body),
            });
        }
        Ok(())
    }
}

impl StatusService for MemosApiClient {
    async fn fetch_system_status(&self) -> Result<SystemStatus> {
        let body = self
            .get_text(STATUS_PATH)
            .await?
            .ok_or_else(|| Error::NotFound(STATUS_PATH.to_string()))?;
        parse_system_status(&body)
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let path = format!("{USERS_PATH}/{}", urlencoding::encode(username));
        match self.get_text(&path).await? {
            Some(body) => parse_user(&body),
            None => Ok(None),
        }
    }
}
