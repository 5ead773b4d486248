use std::io::Cursor;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use clap::{CommandFactory, Parser};
use memos_core::dialog::{ConfirmDialog, ConfirmRequest, DialogSeverity};
use memos_core::document::{DocumentSnapshot, SETUP_ROUTE};
use memos_core::i18n::{Catalog, Translator};
use memos_core::models::PreferencePatch;
use memos_core::preferences::PreferenceStore;
use memos_core::resources::{
    group_resources, BucketOrder, CleanupOutcome, DeletionReport, FailedDeletion,
};
use memos_core::{AppPhase, Appearance, Locale, ResolvedMode, Resource, ResourceId};
use pretty_assertions::assert_eq;

use crate::cli::{Cli, Commands, OrderArg, PrefsCommands, ResourceCommands};
use crate::commands::common::{
    default_db_path, format_resource_line, format_size, open_persistent_preferences,
    resolve_db_path, GlobalOptions,
};
use crate::commands::prefs::{build_patch, format_preferences_lines, preferences_view, run_prefs_set};
use crate::commands::resources::{format_group_lines, format_outcome_lines, format_report_lines};
use crate::commands::session::{run_session_clear, run_session_use};
use crate::commands::status::{format_status_lines, StatusReport};
use crate::error::CliError;
use crate::terminal::{is_affirmative, prompt, TerminalDialog};

fn catalog() -> Catalog {
    Catalog::new(Locale::default())
}

fn persistent_options(dir: &tempfile::TempDir) -> GlobalOptions {
    GlobalOptions {
        db_path: Some(dir.path().join("preferences.db")),
        prefers_dark: Some(false),
        ..GlobalOptions::default()
    }
}

fn request() -> ConfirmRequest {
    ConfirmRequest {
        name: "test-dialog",
        title: "Delete?".to_string(),
        content: "Really?".to_string(),
        severity: DialogSeverity::Warning,
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn prefers_dark_flag_accepts_bare_and_explicit_values() {
    let bare = Cli::try_parse_from(["memos", "--prefers-dark", "status"]).unwrap();
    assert_eq!(bare.prefers_dark, Some(true));

    let explicit = Cli::try_parse_from(["memos", "status", "--prefers-dark=false"]).unwrap();
    assert_eq!(explicit.prefers_dark, Some(false));

    let absent = Cli::try_parse_from(["memos", "status"]).unwrap();
    assert_eq!(absent.prefers_dark, None);
}

#[test]
fn resources_list_defaults_to_newest_first() {
    let cli = Cli::try_parse_from(["memos", "resources", "list"]).unwrap();
    let Commands::Resources {
        command: ResourceCommands::List { json, order },
    } = cli.command
    else {
        panic!("expected resources list");
    };
    assert!(!json);
    assert_eq!(order, OrderArg::Newest);
    assert_eq!(BucketOrder::from(order), BucketOrder::Newest);
}

#[test]
fn prefs_set_parses_appearance() {
    let cli = Cli::try_parse_from(["memos", "prefs", "set", "--appearance", "dark"]).unwrap();
    let Commands::Prefs {
        command: PrefsCommands::Set { locale, appearance },
    } = cli.command
    else {
        panic!("expected prefs set");
    };
    assert!(locale.is_none());
    assert_eq!(appearance.map(Appearance::from), Some(Appearance::Dark));
}

#[test]
fn status_follow_conflicts_with_json() {
    assert!(Cli::try_parse_from(["memos", "status", "--json", "--follow"]).is_err());
}

#[test]
fn resolve_db_path_prefers_explicit_path() {
    let explicit = PathBuf::from("/tmp/custom.db");
    assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
    assert_eq!(resolve_db_path(None), default_db_path());
    assert!(default_db_path().ends_with("memos/preferences.db"));
}

#[test]
fn build_patch_requires_a_change() {
    assert!(matches!(build_patch(None, None), Err(CliError::NothingToUpdate)));
    assert!(matches!(build_patch(Some("  "), None), Err(CliError::EmptyLocale)));

    let patch = build_patch(Some("fr"), None).unwrap();
    assert_eq!(patch, PreferencePatch::locale(Locale::parse("fr").unwrap()));
}

#[test]
fn preferences_view_marks_defaults() {
    let view = preferences_view(&PreferencePatch::appearance(Appearance::System), true);
    assert!(view.locale_is_default);
    assert!(!view.appearance_is_default);
    assert_eq!(view.resolved_mode, ResolvedMode::Dark);

    assert_eq!(
        format_preferences_lines(&view),
        vec![
            "locale:     en (default)".to_string(),
            "appearance: system".to_string(),
            "mode:       dark".to_string(),
        ]
    );
}

#[test]
fn format_size_uses_binary_units() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(2048), "2.0 KB");
    assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
}

#[test]
fn affirmative_answers() {
    assert!(is_affirmative("y\n"));
    assert!(is_affirmative(" YES "));
    assert!(!is_affirmative(""));
    assert!(!is_affirmative("no"));
}

#[test]
fn prompt_writes_title_and_reads_answer() {
    let mut input = Cursor::new("y\n");
    let mut output = Vec::new();

    assert!(prompt(&request(), &mut input, &mut output).unwrap());
    assert_eq!(String::from_utf8(output).unwrap(), "[warning] Delete?\nReally? [y/N] ");

    let mut empty = Cursor::new("");
    assert!(!prompt(&request(), &mut empty, &mut Vec::new()).unwrap());
}

#[test]
fn prompt_title_carries_severity_marker() {
    let info = ConfirmRequest {
        severity: DialogSeverity::Info,
        ..request()
    };
    let mut output = Vec::new();
    prompt(&info, &mut Cursor::new("n\n"), &mut output).unwrap();
    assert!(String::from_utf8(output).unwrap().starts_with("Delete?\n"));

    let danger = ConfirmRequest {
        severity: DialogSeverity::Danger,
        ..request()
    };
    let mut output = Vec::new();
    prompt(&danger, &mut Cursor::new("n\n"), &mut output).unwrap();
    assert!(String::from_utf8(output).unwrap().starts_with("[danger] Delete?\n"));
}

#[tokio::test]
async fn assume_yes_dialog_confirms_without_prompting() {
    assert!(TerminalDialog::new(true).confirm(&request()).await);
}

#[test]
fn group_lines_list_months_then_unused() {
    let resources = vec![
        Resource::new(1, "a.png", Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()).with_memo(10),
        Resource::new(2, "b.png", Utc.with_ymd_and_hms(2023, 12, 5, 0, 0, 0).unwrap()).with_memo(11),
        Resource::new(3, "c.png", Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap()),
    ];
    let groups = group_resources(&resources).sorted(BucketOrder::Newest);
    let lines = format_group_lines(&groups, &catalog());

    assert_eq!(lines[0], "2024");
    assert_eq!(lines[1], "  Jan");
    assert!(lines[2].contains("a.png"));
    assert!(lines[2].ends_with("(#10)"));
    assert_eq!(lines[3], "2023");
    assert_eq!(lines[4], "  Dec");
    assert!(lines[5].contains("b.png"));
    assert_eq!(lines[6], "");
    assert_eq!(lines[7], "Unused resources (1)");
    assert!(lines[8].contains("c.png"));
    assert!(!lines[8].contains("(#"));
}

#[test]
fn resource_line_shows_linked_memo_only() {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let linked = format_resource_line(&Resource::new(4, "d.png", created).with_memo(42));
    assert!(linked.starts_with("#4 "));
    assert!(linked.ends_with("  (#42)"));

    let zero_memo = format_resource_line(&Resource::new(5, "e.png", created).with_memo(0));
    assert!(!zero_memo.contains("(#"));
}

#[test]
fn group_lines_report_empty_list() {
    let lines = format_group_lines(&group_resources(&[]), &catalog());
    assert_eq!(lines, vec!["No data found.".to_string()]);
}

#[test]
fn report_lines_show_deleted_then_failed() {
    let report = DeletionReport {
        deleted: vec![ResourceId(1)],
        failed: vec![FailedDeletion {
            id: ResourceId(3),
            error: "API error (500): boom".to_string(),
        }],
    };

    assert_eq!(
        format_report_lines(&report, &catalog()),
        vec![
            "Deleted #1".to_string(),
            "Failed to delete #3: API error (500): boom".to_string(),
        ]
    );
}

#[test]
fn outcome_lines_distinguish_no_unused_from_no_data() {
    let catalog = catalog();

    assert_eq!(
        format_outcome_lines(&CleanupOutcome::NothingToDelete, &catalog),
        vec!["No unused resources.".to_string()]
    );
    assert_eq!(
        format_outcome_lines(&CleanupOutcome::Declined, &catalog),
        vec!["Cancelled".to_string()]
    );

    catalog.change_language(&Locale::parse("zh-Hans").unwrap());
    assert_eq!(
        format_outcome_lines(&CleanupOutcome::NothingToDelete, &catalog),
        vec!["没有未使用的资源。".to_string()]
    );
}

#[test]
fn status_lines_include_redirect_when_navigated() {
    let report = StatusReport {
        server: "http://localhost:8081".to_string(),
        instance: String::new(),
        initialized: false,
        allow_sign_up: true,
        user: None,
        phase: AppPhase::Ready,
        locale: Locale::default(),
        appearance: Appearance::System,
        mode: ResolvedMode::Light,
        document: DocumentSnapshot {
            navigations: vec![SETUP_ROUTE.to_string()],
            ..DocumentSnapshot::default()
        },
    };

    let lines = format_status_lines(&report, &catalog());
    assert!(lines.contains(&"Instance:    (unnamed)".to_string()));
    assert!(lines.contains(&"User:        (signed out)".to_string()));
    assert_eq!(lines.last().unwrap(), &format!("Redirect:    {SETUP_ROUTE}"));
}

#[tokio::test(flavor = "multi_thread")]
async fn prefs_set_keeps_earlier_changes() {
    let dir = tempfile::tempdir().unwrap();
    let options = persistent_options(&dir);

    run_prefs_set(&options, None, Some(Appearance::Dark)).await.unwrap();
    run_prefs_set(&options, Some("zh-Hans"), None).await.unwrap();

    let store = open_persistent_preferences(&dir.path().join("preferences.db"))
        .await
        .unwrap();
    let stored = store.load().await.unwrap();
    assert_eq!(stored.locale, Locale::parse("zh-Hans"));
    assert_eq!(stored.appearance, Some(Appearance::Dark));
}

#[tokio::test(flavor = "multi_thread")]
async fn session_marker_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let options = persistent_options(&dir);

    run_session_use(&options, " steven ").await.unwrap();
    let store = options.open_preferences().await.unwrap();
    assert_eq!(
        store.load_session().await.unwrap().map(|session| session.username),
        Some("steven".to_string())
    );

    run_session_clear(&options).await.unwrap();
    assert!(store.load_session().await.unwrap().is_none());

    assert!(matches!(
        run_session_use(&options, "   ").await,
        Err(CliError::EmptyUsername)
    ));
}

#[tokio::test]
async fn ephemeral_preferences_do_not_touch_disk() {
    let dir = tempfile::tempdir().unwrap();
    let options = GlobalOptions {
        ephemeral: true,
        ..persistent_options(&dir)
    };

    run_prefs_set(&options, Some("fr"), None).await.unwrap();

    assert!(!dir.path().join("preferences.db").exists());
    assert!(options.open_preferences().await.unwrap().load().await.unwrap().is_empty());
}
