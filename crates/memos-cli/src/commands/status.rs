use memos_core::api::StatusService;
use memos_core::document::DocumentSnapshot;
use memos_core::i18n::Catalog;
use memos_core::sync::hydrate_session;
use memos_core::{AppPhase, Appearance, Locale, ResolvedMode, User};
use serde::Serialize;
use tokio::task::LocalSet;

use crate::commands::common::{ClientSession, GlobalOptions};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub server: String,
    pub instance: String,
    pub initialized: bool,
    pub allow_sign_up: bool,
    pub user: Option<String>,
    pub phase: AppPhase,
    pub locale: Locale,
    pub appearance: Appearance,
    pub mode: ResolvedMode,
    pub document: DocumentSnapshot,
}

pub async fn run_status(
    options: &GlobalOptions,
    local: &LocalSet,
    as_json: bool,
    follow: bool,
) -> Result<(), CliError> {
    let client = options.api_client()?;
    let status = client.fetch_system_status().await?;
    let session = ClientSession::open(
        options,
        &status.customized_profile.preference_defaults(),
    )
    .await?;

    let initialized = status.is_initialized();
    let allow_sign_up = status.allow_sign_up;
    let instance = status.customized_profile.name.clone();
    session.store.set_system_status(status);

    let stored_session = session.preferences.load_session().await?;
    let user = hydrate_session(
        &session.store,
        stored_session.as_ref(),
        &client,
        client.config().request_timeout,
    )
    .await;

    session.sync.reconcile().await;

    if follow {
        return follow_theme(&session, local).await;
    }

    let report = StatusReport {
        server: client.config().server_url.clone(),
        instance,
        initialized,
        allow_sign_up,
        user: user.as_ref().map(|user| display_user(user).to_string()),
        phase: session.store.phase(),
        locale: session.store.locale(),
        appearance: session.store.appearance(),
        mode: session.store.resolved_mode(),
        document: session.document.snapshot(),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_status_lines(&report, &session.catalog) {
            println!("{line}");
        }
    }

    Ok(())
}

async fn follow_theme(session: &ClientSession, local: &LocalSet) -> Result<(), CliError> {
    let handle = session.sync.start(local)?;
    if !handle.is_tracking_color_scheme() {
        tracing::warn!("OS color scheme changes will not be reported");
    }

    let mut modes = session.store.subscribe_resolved_mode();
    let label = session.catalog.translate("setting.appearance");
    println!(
        "{label}: {} ({})",
        session.store.appearance(),
        modes.borrow_and_update().css_class()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            changed = modes.changed() => {
                if changed.is_err() {
                    break;
                }
                let mode = *modes.borrow_and_update();
                println!("{label}: {} ({})", session.store.appearance(), mode.css_class());
            }
        }
    }

    handle.shutdown();
    Ok(())
}

pub fn format_status_lines(report: &StatusReport, catalog: &Catalog) -> Vec<String> {
    let instance = if report.instance.is_empty() {
        "(unnamed)"
    } else {
        report.instance.as_str()
    };
    let mut lines = vec![
        format!("Server:      {}", report.server),
        format!("Instance:    {instance}"),
        format!(
            "Initialized: {}",
            if report.initialized { "yes" } else { "no" }
        ),
        format!(
            "User:        {}",
            report.user.as_deref().unwrap_or("(signed out)")
        ),
        format!(
            "{}:    {}",
            catalog.translate("setting.language"),
            report.locale
        ),
        format!(
            "{}:  {} ({})",
            catalog.translate("setting.appearance"),
            report.appearance,
            report.mode.css_class()
        ),
        format!(
            "Favicon:     {}",
            report.document.favicon.as_deref().unwrap_or("-")
        ),
        format!(
            "Injected:    {} style(s), {} script(s)",
            report.document.styles.len(),
            report.document.scripts.len()
        ),
    ];

    if let Some(route) = report.document.navigations.last() {
        lines.push(format!("Redirect:    {route}"));
    }

    lines
}

/// Name shown for a hydrated user.
pub fn display_user(user: &User) -> &str {
    if user.nickname.trim().is_empty() {
        &user.username
    } else {
        &user.nickname
    }
}
