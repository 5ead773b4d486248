//! Shared client state container.
//!
//! Each field lives in its own `watch` channel. Fields are written through a
//! single setter and observed through `subscribe_*` receivers. A setter only
//! notifies when the value actually changes, so subscribers see one
//! notification per distinct value.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::models::{Appearance, Locale, Preferences, SystemStatus, User};
use crate::theme::ResolvedMode;

/// Application lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppPhase {
    /// Session hydration has not finished; only a placeholder is shown
    #[default]
    Loading,
    Ready,
}

struct Channels {
    system_status: watch::Sender<Option<SystemStatus>>,
    locale: watch::Sender<Locale>,
    appearance: watch::Sender<Appearance>,
    resolved_mode: watch::Sender<ResolvedMode>,
    phase: watch::Sender<AppPhase>,
    current_user: watch::Sender<Option<User>>,
}

/// Process-wide client state. Cloning shares the same channels.
#[derive(Clone)]
pub struct AppStore {
    channels: Arc<Channels>,
}

impl AppStore {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            channels: Arc::new(Channels {
                system_status: watch::Sender::new(None),
                locale: watch::Sender::new(preferences.locale),
                appearance: watch::Sender::new(preferences.appearance),
                resolved_mode: watch::Sender::new(ResolvedMode::default()),
                phase: watch::Sender::new(AppPhase::Loading),
                current_user: watch::Sender::new(None),
            }),
        }
    }

    /// The last fetched status; `None` until bootstrap has fetched one.
    pub fn system_status(&self) -> Option<SystemStatus> {
        self.channels.system_status.borrow().clone()
    }

    pub fn locale(&self) -> Locale {
        self.channels.locale.borrow().clone()
    }

    pub fn appearance(&self) -> Appearance {
        *self.channels.appearance.borrow()
    }

    pub fn resolved_mode(&self) -> ResolvedMode {
        *self.channels.resolved_mode.borrow()
    }

    pub fn phase(&self) -> AppPhase {
        *self.channels.phase.borrow()
    }

    pub fn current_user(&self) -> Option<User> {
        self.channels.current_user.borrow().clone()
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            locale: self.locale(),
            appearance: self.appearance(),
        }
    }

    /// Replace the status snapshot fetched from the server.
    pub fn set_system_status(&self, status: SystemStatus) -> bool {
        replace_if_changed(&self.channels.system_status, Some(status))
    }

    pub fn set_locale(&self, locale: Locale) -> bool {
        replace_if_changed(&self.channels.locale, locale)
    }

    pub fn set_appearance(&self, appearance: Appearance) -> bool {
        replace_if_changed(&self.channels.appearance, appearance)
    }

    /// Written by the synchronizer only.
    pub(crate) fn set_resolved_mode(&self, mode: ResolvedMode) -> bool {
        replace_if_changed(&self.channels.resolved_mode, mode)
    }

    pub(crate) fn set_phase(&self, phase: AppPhase) -> bool {
        replace_if_changed(&self.channels.phase, phase)
    }

    pub(crate) fn set_current_user(&self, user: Option<User>) -> bool {
        replace_if_changed(&self.channels.current_user, user)
    }

    pub fn subscribe_system_status(&self) -> watch::Receiver<Option<SystemStatus>> {
        self.channels.system_status.subscribe()
    }

    pub fn subscribe_locale(&self) -> watch::Receiver<Locale> {
        self.channels.locale.subscribe()
    }

    pub fn subscribe_appearance(&self) -> watch::Receiver<Appearance> {
        self.channels.appearance.subscribe()
    }

    pub fn subscribe_resolved_mode(&self) -> watch::Receiver<ResolvedMode> {
        self.channels.resolved_mode.subscribe()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

fn replace_if_changed<T: PartialEq>(sender: &watch::Sender<T>, value: T) -> bool {
    sender.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    })
}
