//! Session hydration

use std::time::Duration;

use crate::api::StatusService;
use crate::error::Error;
use crate::models::{StoredSession, User};
use crate::state::{AppPhase, AppStore};

/// Resolve the stored session to a user record and mark the client ready.
///
/// The phase always ends as [`AppPhase::Ready`]: a missing session, an
/// unknown user, a failed lookup and a lookup slower than `timeout` all
/// leave the client signed out.
pub async fn hydrate_session<S: StatusService>(
    store: &AppStore,
    session: Option<&StoredSession>,
    service: &S,
    timeout: Duration,
) -> Option<User> {
    let user = match session {
        Some(session) => lookup_user(session, service, timeout).await,
        None => None,
    };

    store.set_current_user(user.clone());
    store.set_phase(AppPhase::Ready);
    user
}

async fn lookup_user<S: StatusService>(
    session: &StoredSession,
    service: &S,
    timeout: Duration,
) -> Option<User> {
    let lookup = tokio::time::timeout(timeout, service.fetch_user_by_username(&session.username));
    let result = lookup.await.unwrap_or_else(|_| {
        Err(Error::Timeout(format!(
            "user lookup did not finish within {timeout:?}"
        )))
    });

    match result {
        Ok(Some(user)) => {
            tracing::debug!("Restored session for {}", user.username);
            Some(user)
        }
        Ok(None) => {
            tracing::warn!("Stored session user {} no longer exists", session.username);
            None
        }
        Err(error) => {
            tracing::warn!("Failed to restore session for {}: {}", session.username, error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::SystemStatus;

    enum Lookup {
        Found,
        Missing,
        Fails,
        Hangs,
    }

    struct FakeStatus(Lookup);

    impl StatusService for FakeStatus {
        async fn fetch_system_status(&self) -> Result<SystemStatus> {
            Ok(SystemStatus::default())
        }

        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>> {
            match self.0 {
                Lookup::Found => Ok(Some(User {
                    id: 7,
                    username: username.to_string(),
                    ..User::default()
                })),
                Lookup::Missing => Ok(None),
                Lookup::Fails => Err(Error::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
                Lookup::Hangs => std::future::pending().await,
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn known_session_sets_current_user() {
        let store = AppStore::default();
        let session = StoredSession::new("steven").unwrap();

        let user = hydrate_session(&store, Some(&session), &FakeStatus(Lookup::Found), TIMEOUT).await;

        assert_eq!(user.map(|user| user.id), Some(7));
        assert_eq!(store.current_user().map(|user| user.username), Some("steven".to_string()));
        assert_eq!(store.phase(), AppPhase::Ready);
    }

    #[tokio::test]
    async fn no_session_still_becomes_ready() {
        let store = AppStore::default();
        let user = hydrate_session(&store, None, &FakeStatus(Lookup::Found), TIMEOUT).await;

        assert!(user.is_none());
        assert_eq!(store.phase(), AppPhase::Ready);
    }

    #[tokio::test]
    async fn missing_or_failing_lookup_signs_out() {
        for lookup in [Lookup::Missing, Lookup::Fails] {
            let store = AppStore::default();
            let session = StoredSession::new("steven").unwrap();

            let user = hydrate_session(&store, Some(&session), &FakeStatus(lookup), TIMEOUT).await;

            assert!(user.is_none());
            assert_eq!(store.phase(), AppPhase::Ready);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_lookup_times_out_to_ready() {
        let store = AppStore::default();
        let session = StoredSession::new("steven").unwrap();

        let user = hydrate_session(&store, Some(&session), &FakeStatus(Lookup::Hangs), TIMEOUT).await;

        assert!(user.is_none());
        assert!(store.current_user().is_none());
        assert_eq!(store.phase(), AppPhase::Ready);
    }
}
