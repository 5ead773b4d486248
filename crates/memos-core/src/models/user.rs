//! User model

use serde::{Deserialize, Serialize};

/// Role of a user within the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Host,
    Admin,
    User,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// A user record as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: String,
}

/// Locally persisted marker for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
}

impl StoredSession {
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            None
        } else {
            Some(Self { username })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_maps_to_unspecified() {
        let user: User = serde_json::from_str(r#"{"id": 3, "username": "a", "role": "GUEST"}"#).unwrap();
        assert_eq!(user.role, UserRole::Unspecified);
    }

    #[test]
    fn stored_session_requires_username() {
        assert!(StoredSession::new("  ").is_none());
        assert_eq!(StoredSession::new(" steven ").unwrap().username, "steven");
    }
}
