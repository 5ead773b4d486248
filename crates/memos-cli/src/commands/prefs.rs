use memos_core::models::PreferencePatch;
use memos_core::preferences::PreferenceStore;
use memos_core::theme::resolve_mode;
use memos_core::{Appearance, Locale, ResolvedMode};
use serde::Serialize;

use crate::commands::common::{ClientSession, GlobalOptions};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct PreferencesView {
    pub locale: Locale,
    pub locale_is_default: bool,
    pub appearance: Appearance,
    pub appearance_is_default: bool,
    pub resolved_mode: ResolvedMode,
}

pub async fn run_prefs_show(options: &GlobalOptions, as_json: bool) -> Result<(), CliError> {
    let stored = options.open_preferences().await?.load().await?;
    let view = preferences_view(&stored, options.color_scheme().prefers_dark());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_preferences_lines(&view) {
            println!("{line}");
        }
    }

    Ok(())
}

/// Apply changes through the store so the synchronizer persists them.
pub async fn run_prefs_set(
    options: &GlobalOptions,
    locale: Option<&str>,
    appearance: Option<Appearance>,
) -> Result<(), CliError> {
    let patch = build_patch(locale, appearance)?;
    let session = ClientSession::open(options, &PreferencePatch::default()).await?;
    session.sync.reconcile().await;

    if let Some(locale) = patch.locale {
        session.store.set_locale(locale);
    }
    if let Some(appearance) = patch.appearance {
        session.store.set_appearance(appearance);
    }
    session.sync.reconcile().await;

    let stored = session.preferences.load().await?;
    let view = preferences_view(&stored, options.color_scheme().prefers_dark());
    for line in format_preferences_lines(&view) {
        println!("{line}");
    }

    Ok(())
}

pub fn build_patch(
    locale: Option<&str>,
    appearance: Option<Appearance>,
) -> Result<PreferencePatch, CliError> {
    let locale = match locale {
        Some(raw) => Some(Locale::parse(raw).ok_or(CliError::EmptyLocale)?),
        None => None,
    };
    let patch = PreferencePatch { locale, appearance };
    if patch.is_empty() {
        return Err(CliError::NothingToUpdate);
    }
    Ok(patch)
}

pub fn preferences_view(stored: &PreferencePatch, system_prefers_dark: bool) -> PreferencesView {
    let locale = stored.locale.clone().unwrap_or_default();
    let appearance = stored.appearance.unwrap_or_default();
    PreferencesView {
        locale_is_default: stored.locale.is_none(),
        appearance_is_default: stored.appearance.is_none(),
        resolved_mode: resolve_mode(appearance, system_prefers_dark),
        locale,
        appearance,
    }
}

pub fn format_preferences_lines(view: &PreferencesView) -> Vec<String> {
    let marker = |is_default: bool| if is_default { " (default)" } else { "" };
    vec![
        format!("locale:     {}{}", view.locale, marker(view.locale_is_default)),
        format!(
            "appearance: {}{}",
            view.appearance,
            marker(view.appearance_is_default)
        ),
        format!("mode:       {}", view.resolved_mode.css_class()),
    ]
}
