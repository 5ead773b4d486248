//! OS color-scheme signal sources
//!
//! A source reports whether the operating system currently prefers a dark
//! color scheme and notifies listeners when that changes. Registration is
//! probed: the primary mechanism first, then a legacy one. A source that
//! supports neither leaves the client without live tracking, which callers
//! treat as a degraded but working state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;

use crate::theme::detect_system_dark_mode;

/// Callback invoked with `true` when the OS switches to dark, `false` for light.
pub type ColorSchemeListener = Arc<dyn Fn(bool) + Send + Sync>;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("color scheme signal unavailable: {0}")]
    Unavailable(String),
    #[error("{0} listener registration is not supported")]
    Unsupported(&'static str),
}

/// Guard for a registered listener. Dropping it unsubscribes.
pub struct ColorSchemeSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ColorSchemeSubscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ColorSchemeSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for ColorSchemeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorSchemeSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// A source of the OS dark/light preference.
pub trait ColorSchemeSource {
    /// Current OS preference.
    fn prefers_dark(&self) -> bool;

    /// Register a change listener with the primary mechanism.
    fn subscribe(
        &self,
        listener: ColorSchemeListener,
    ) -> Result<ColorSchemeSubscription, SignalError>;

    /// Register a change listener with the older registration mechanism.
    fn subscribe_legacy(
        &self,
        listener: ColorSchemeListener,
    ) -> Result<ColorSchemeSubscription, SignalError> {
        let _ = listener;
        Err(SignalError::Unsupported("legacy"))
    }
}

/// Register `listener`, falling back to legacy registration when the primary
/// mechanism is unavailable.
pub fn subscribe_with_fallback(
    source: &dyn ColorSchemeSource,
    listener: ColorSchemeListener,
) -> Result<ColorSchemeSubscription, SignalError> {
    match source.subscribe(Arc::clone(&listener)) {
        Ok(subscription) => Ok(subscription),
        Err(primary_error) => {
            tracing::debug!(
                "Primary color scheme listener unavailable ({}), trying legacy registration",
                primary_error
            );
            source.subscribe_legacy(listener)
        }
    }
}

/// In-process source whose value is set explicitly.
///
/// Used when the preference comes from a flag or a test rather than the OS.
#[derive(Clone)]
pub struct ManualColorScheme {
    inner: Arc<Mutex<ManualInner>>,
}

struct ManualInner {
    prefers_dark: bool,
    listeners: Vec<(u64, ColorSchemeListener)>,
    next_id: u64,
    primary_available: bool,
    legacy_available: bool,
}

impl ManualColorScheme {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                prefers_dark,
                listeners: Vec::new(),
                next_id: 0,
                primary_available: true,
                legacy_available: true,
            })),
        }
    }

    /// Reject primary registration, forcing callers onto the legacy path.
    #[must_use]
    pub fn without_primary(self) -> Self {
        self.lock().primary_available = false;
        self
    }

    /// Reject legacy registration.
    #[must_use]
    pub fn without_legacy(self) -> Self {
        self.lock().legacy_available = false;
        self
    }

    /// Change the preference and notify listeners if it differs.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        let listeners = {
            let mut inner = self.lock();
            if inner.prefers_dark == prefers_dark {
                return;
            }
            inner.prefers_dark = prefers_dark;
            inner
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect::<Vec<_>>()
        };

        for listener in listeners {
            listener(prefers_dark);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn register(&self, listener: ColorSchemeListener) -> ColorSchemeSubscription {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        let inner = Arc::clone(&self.inner);
        ColorSchemeSubscription::new(move || {
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .retain(|(listener_id, _)| *listener_id != id);
        })
    }

    fn lock(&self) -> MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ColorSchemeSource for ManualColorScheme {
    fn prefers_dark(&self) -> bool {
        self.lock().prefers_dark
    }

    fn subscribe(
        &self,
        listener: ColorSchemeListener,
    ) -> Result<ColorSchemeSubscription, SignalError> {
        if !self.lock().primary_available {
            return Err(SignalError::Unsupported("primary"));
        }
        Ok(self.register(listener))
    }

    fn subscribe_legacy(
        &self,
        listener: ColorSchemeListener,
    ) -> Result<ColorSchemeSubscription, SignalError> {
        if !self.lock().legacy_available {
            return Err(SignalError::Unsupported("legacy"));
        }
        Ok(self.register(listener))
    }
}

/// Desktop source that polls the platform setting on an interval.
///
/// The platform probe spawns a process, so the last observed value is
/// cached. Only the first read probes synchronously; the poller keeps the
/// cache current afterwards.
#[derive(Debug, Clone, Default)]
pub struct SystemColorScheme {
    last_known: Arc<OnceLock<AtomicBool>>,
}

impl SystemColorScheme {
    fn cache(&self) -> &AtomicBool {
        self.last_known
            .get_or_init(|| AtomicBool::new(detect_system_dark_mode()))
    }
}

fn remember(last_known: &OnceLock<AtomicBool>, prefers_dark: bool) {
    last_known
        .get_or_init(|| AtomicBool::new(prefers_dark))
        .store(prefers_dark, Ordering::Relaxed);
}

impl ColorSchemeSource for SystemColorScheme {
    fn prefers_dark(&self) -> bool {
        self.cache().load(Ordering::Relaxed)
    }

    fn subscribe(
        &self,
        listener: ColorSchemeListener,
    ) -> Result<ColorSchemeSubscription, SignalError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|error| SignalError::Unavailable(error.to_string()))?;
        let last_known = Arc::clone(&self.last_known);

        let task = runtime.spawn(async move {
            let mut last = tokio::task::spawn_blocking(detect_system_dark_mode)
                .await
                .unwrap_or(false);
            remember(&last_known, last);

            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Ok(current) = tokio::task::spawn_blocking(detect_system_dark_mode).await
                else {
                    continue;
                };
                if current != last {
                    tracing::debug!(
                        "System color scheme changed to {}",
                        if current { "dark" } else { "light" }
                    );
                    last = current;
                    remember(&last_known, current);
                    listener(current);
                }
            }
        });

        Ok(ColorSchemeSubscription::new(move || task.abort()))
    }
}
