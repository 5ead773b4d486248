//! Remote Memos API
//!
//! The rest of the crate talks to the server only through the
//! [`ResourceService`] and [`StatusService`] traits, so tests and other
//! front-ends can substitute their own transport.

mod client;

use serde::Deserialize;

use crate::error::Result;
use crate::models::{Resource, ResourceId, SystemStatus, User};

pub use client::MemosApiClient;

/// Listing and deletion of uploaded resources
#[allow(async_fn_in_trait)]
pub trait ResourceService {
    /// All resources visible to the current user, in server order.
    async fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Delete one resource. Deleting an id that no longer exists succeeds.
    async fn delete_resource(&self, id: ResourceId) -> Result<()>;
}

/// Instance status and user lookup
#[allow(async_fn_in_trait)]
pub trait StatusService {
    async fn fetch_system_status(&self) -> Result<SystemStatus>;

    /// Look up a user by username; `None` when no such user exists.
    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[derive(Debug, Deserialize)]
struct ListResourcesResponse {
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct GetUserResponse {
    user: Option<User>,
}

/// Parse the body of a resource listing.
pub fn parse_resource_list(payload: &str) -> Result<Vec<Resource>> {
    let response: ListResourcesResponse = serde_json::from_str(payload)?;
    Ok(response.resources)
}

/// Parse the body of the status endpoint.
pub fn parse_system_status(payload: &str) -> Result<SystemStatus> {
    Ok(serde_json::from_str(payload)?)
}

/// Parse the body of a user lookup.
pub fn parse_user(payload: &str) -> Result<Option<User>> {
    let response: GetUserResponse = serde_json::from_str(payload)?;
    Ok(response.user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemoId;

    #[test]
    fn parse_resource_list_keeps_server_order() {
        let payload = r#"{
            "resources": [
                { "id": 3, "filename": "c.txt", "createdTs": "2024-02-01T00:00:00Z" },
                { "id": 1, "filename": "a.png", "createdTs": "2024-01-10T12:00:00Z", "memoId": 9 }
            ]
        }"#;

        let resources = parse_resource_list(payload).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].id, ResourceId(3));
        assert_eq!(resources[1].memo_id, Some(MemoId(9)));
    }

    #[test]
    fn parse_resource_list_accepts_empty_object() {
        assert!(parse_resource_list("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_user_unwraps_envelope() {
        let user = parse_user(r#"{"user": {"id": 1, "username": "steven", "nickname": "Steven"}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(user.username, "steven");
        assert_eq!(parse_user(r#"{"user": null}"#).unwrap(), None);
    }

    #[test]
    fn parse_system_status_rejects_malformed_json() {
        assert!(parse_system_status("not json").is_err());
    }
}
