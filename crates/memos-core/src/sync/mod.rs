//! Preference and environment synchronizer
//!
//! Keeps the host document, the translator, the preference store and the
//! resolved theme consistent with the [`AppStore`]. Each rule observes one
//! slice of state and re-runs when that slice changes. Rules remember the
//! last value they applied, so re-delivering an identical value is a no-op.
//!
//! Rules run as local tasks on a [`LocalSet`]; they never hold state borrows
//! across an await point, so interleaving between rules is safe.

mod session;

pub use session::hydrate_session;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinHandle, LocalSet};

use crate::document::{Document, DEFAULT_FAVICON, SETUP_ROUTE};
use crate::error::{Error, Result};
use crate::i18n::Translator;
use crate::models::{Appearance, CustomizedProfile, Locale, PreferencePatch, SystemStatus};
use crate::preferences::PreferenceStore;
use crate::signal::{
    subscribe_with_fallback, ColorSchemeListener, ColorSchemeSource, ColorSchemeSubscription,
};
use crate::state::AppStore;
use crate::theme::{resolve_mode, ResolvedMode};

#[derive(Debug, Default)]
struct Applied {
    host_missing: Option<bool>,
    style: Option<String>,
    script: Option<String>,
    profile: Option<CustomizedProfile>,
    locale: Option<Locale>,
    appearance: Option<Appearance>,
    mode: Option<ResolvedMode>,
}

/// Applies [`AppStore`] changes to the document and the preference store.
pub struct Synchronizer<D, P, T> {
    store: AppStore,
    document: Rc<D>,
    preferences: Rc<P>,
    translator: Rc<T>,
    color_scheme: Rc<dyn ColorSchemeSource>,
    applied: RefCell<Applied>,
    started: Cell<bool>,
}

impl<D, P, T> Synchronizer<D, P, T>
where
    D: Document + 'static,
    P: PreferenceStore + 'static,
    T: Translator + 'static,
{
    pub fn new(
        store: AppStore,
        document: Rc<D>,
        preferences: Rc<P>,
        translator: Rc<T>,
        color_scheme: Rc<dyn ColorSchemeSource>,
    ) -> Self {
        Self {
            store,
            document,
            preferences,
            translator,
            color_scheme,
            applied: RefCell::new(Applied::default()),
            started: Cell::new(false),
        }
    }

    /// Spawn one watcher per rule on `local` and register the OS signal
    /// listener. Every rule runs once with the current value before waiting
    /// for changes.
    ///
    /// A synchronizer starts at most once; later calls fail without
    /// registering another listener, even after the first handle is gone.
    pub fn start(self: &Rc<Self>, local: &LocalSet) -> Result<SyncHandle> {
        if self.started.replace(true) {
            tracing::warn!("Synchronizer is already started");
            return Err(Error::InvalidInput(
                "synchronizer can only be started once".to_string(),
            ));
        }

        let subscription = self.subscribe_color_scheme();

        let tasks = vec![
            self.watch(
                local,
                self.store.subscribe_system_status(),
                |sync, status| async move {
                    if let Some(status) = status {
                        sync.on_system_status(&status);
                    }
                },
            ),
            self.watch(
                local,
                self.store.subscribe_locale(),
                |sync, locale| async move { sync.on_locale(locale).await },
            ),
            self.watch(
                local,
                self.store.subscribe_appearance(),
                |sync, appearance| async move { sync.on_appearance(appearance).await },
            ),
            self.watch(
                local,
                self.store.subscribe_resolved_mode(),
                |sync, mode| async move { sync.on_resolved_mode(mode) },
            ),
        ];

        Ok(SyncHandle {
            tasks,
            subscription,
        })
    }

    /// Run every rule against the current store values.
    pub async fn reconcile(&self) {
        if let Some(status) = self.store.system_status() {
            self.on_system_status(&status);
        }
        self.on_locale(self.store.locale()).await;
        self.on_appearance(self.store.appearance()).await;
        self.on_resolved_mode(self.store.resolved_mode());
    }

    /// Host check, custom style and script injection, title and favicon.
    pub fn on_system_status(&self, status: &SystemStatus) {
        self.check_host(status);
        self.inject_additional_style(&status.additional_style);
        self.inject_additional_script(&status.additional_script);
        self.sync_metadata(&status.customized_profile);
    }

    pub async fn on_locale(&self, locale: Locale) {
        if !replace_applied(&mut self.applied.borrow_mut().locale, &locale) {
            return;
        }

        self.document.set_language(locale.as_str());
        self.translator.change_language(&locale);
        tracing::debug!("Applied locale {}", locale);

        if let Err(error) = self.preferences.set(PreferencePatch::locale(locale.clone())).await {
            tracing::error!("Failed to persist locale {}: {}", locale, error);
        }
    }

    pub async fn on_appearance(&self, appearance: Appearance) {
        if !replace_applied(&mut self.applied.borrow_mut().appearance, &appearance) {
            return;
        }

        if let Err(error) = self
            .preferences
            .set(PreferencePatch::appearance(appearance))
            .await
        {
            tracing::error!("Failed to persist appearance {}: {}", appearance, error);
        }

        let mode = resolve_mode(appearance, self.color_scheme.prefers_dark());
        tracing::debug!("Appearance {} resolves to {:?}", appearance, mode);
        self.store.set_resolved_mode(mode);
    }

    pub fn on_resolved_mode(&self, mode: ResolvedMode) {
        if !replace_applied(&mut self.applied.borrow_mut().mode, &mode) {
            return;
        }
        self.document.set_root_class(mode);
    }

    /// OS color scheme change. Ignored unless appearance follows the system.
    pub fn on_os_signal(&self, prefers_dark: bool) {
        apply_os_signal(&self.store, prefers_dark);
    }

    fn check_host(&self, status: &SystemStatus) {
        let missing = status.host.is_none();
        let previously_missing = self.applied.borrow_mut().host_missing.replace(missing);
        if !missing || previously_missing == Some(true) {
            return;
        }

        if self.document.current_route() == SETUP_ROUTE {
            tracing::debug!("Instance has no host, already on {}", SETUP_ROUTE);
            return;
        }

        tracing::info!("Instance has no host yet, redirecting to {}", SETUP_ROUTE);
        self.document.navigate(SETUP_ROUTE);
    }

    fn inject_additional_style(&self, css: &str) {
        if !replace_applied(&mut self.applied.borrow_mut().style, &css.to_string()) {
            return;
        }
        if css.is_empty() {
            return;
        }
        self.document.inject_style(css);
        tracing::info!("Injected additional style ({} bytes)", css.len());
    }

    fn inject_additional_script(&self, script: &str) {
        if !replace_applied(&mut self.applied.borrow_mut().script, &script.to_string()) {
            return;
        }
        if script.is_empty() {
            return;
        }
        self.document.inject_script(script);
        tracing::info!("Injected additional script ({} bytes)", script.len());
    }

    fn sync_metadata(&self, profile: &CustomizedProfile) {
        if !replace_applied(&mut self.applied.borrow_mut().profile, profile) {
            return;
        }

        self.document.set_title(&profile.name);
        let favicon = if profile.logo_url.trim().is_empty() {
            DEFAULT_FAVICON
        } else {
            profile.logo_url.as_str()
        };
        self.document.set_favicon(favicon);
    }

    fn subscribe_color_scheme(&self) -> Option<ColorSchemeSubscription> {
        let store = self.store.clone();
        let listener: ColorSchemeListener =
            Arc::new(move |prefers_dark| apply_os_signal(&store, prefers_dark));

        match subscribe_with_fallback(self.color_scheme.as_ref(), listener) {
            Ok(subscription) => Some(subscription),
            Err(error) => {
                tracing::warn!(
                    "Failed to register color scheme listener: {}. Live OS appearance tracking is disabled.",
                    error
                );
                None
            }
        }
    }

    fn watch<V, F, Fut>(
        self: &Rc<Self>,
        local: &LocalSet,
        mut receiver: watch::Receiver<V>,
        apply: F,
    ) -> JoinHandle<()>
    where
        V: Clone + 'static,
        F: Fn(Rc<Self>, V) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let sync = Rc::clone(self);
        local.spawn_local(async move {
            let initial = receiver.borrow_and_update().clone();
            apply(Rc::clone(&sync), initial).await;

            while receiver.changed().await.is_ok() {
                let value = receiver.borrow_and_update().clone();
                apply(Rc::clone(&sync), value).await;
            }
        })
    }
}

/// Running synchronizer. Dropping it stops every rule and removes the OS
/// listener.
#[must_use = "dropping the handle stops synchronization"]
pub struct SyncHandle {
    tasks: Vec<JoinHandle<()>>,
    subscription: Option<ColorSchemeSubscription>,
}

impl SyncHandle {
    /// Whether an OS color scheme listener was registered.
    pub const fn is_tracking_color_scheme(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn apply_os_signal(store: &AppStore, prefers_dark: bool) {
    if store.appearance() != Appearance::System {
        return;
    }
    let mode = ResolvedMode::from_dark(prefers_dark);
    if store.set_resolved_mode(mode) {
        tracing::debug!("OS color scheme changed, resolved mode is now {:?}", mode);
    }
}

fn replace_applied<V: PartialEq + Clone>(slot: &mut Option<V>, value: &V) -> bool {
    if slot.as_ref() == Some(value) {
        return false;
    }
    *slot = Some(value.clone());
    true
}
