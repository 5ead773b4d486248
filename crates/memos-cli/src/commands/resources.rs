use memos_core::api::ResourceService;
use memos_core::i18n::Catalog;
use memos_core::resources::{
    group_resources, BucketOrder, CleanupOutcome, DeletionReport, ResourceGroups,
    UnusedResourceCleaner,
};

use crate::commands::common::{format_resource_line, load_catalog, GlobalOptions};
use crate::error::CliError;
use crate::terminal::TerminalDialog;

pub async fn run_resources_list(
    options: &GlobalOptions,
    as_json: bool,
    order: BucketOrder,
) -> Result<(), CliError> {
    let client = options.api_client()?;
    let resources = client.list_resources().await?;
    let groups = group_resources(&resources).sorted(order);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        let catalog = load_catalog(options).await?;
        for line in format_group_lines(&groups, &catalog) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_resources_prune(options: &GlobalOptions, assume_yes: bool) -> Result<(), CliError> {
    let client = options.api_client()?;
    let catalog = load_catalog(options).await?;
    let resources = client.list_resources().await?;

    let mut cleaner = UnusedResourceCleaner::new(resources).with_prompt(
        catalog.translate("resource.delete-all-unused"),
        catalog.translate("resource.delete-all-unused-confirm"),
    );
    let outcome = cleaner
        .delete_unused(&TerminalDialog::new(assume_yes), &client)
        .await;

    for line in format_outcome_lines(&outcome, &catalog) {
        println!("{line}");
    }

    match outcome {
        CleanupOutcome::Completed(report) if !report.is_complete() => Err(CliError::PartialCleanup {
            failed: report.failed.len(),
            attempted: report.failed.len() + report.deleted.len(),
        }),
        _ => Ok(()),
    }
}

pub fn format_outcome_lines(outcome: &CleanupOutcome, catalog: &Catalog) -> Vec<String> {
    match outcome {
        CleanupOutcome::NothingToDelete => vec![catalog.translate("resource.no-unused-resources")],
        CleanupOutcome::Declined => vec!["Cancelled".to_string()],
        CleanupOutcome::Completed(report) => format_report_lines(report, catalog),
    }
}

pub fn format_group_lines(groups: &ResourceGroups, catalog: &Catalog) -> Vec<String> {
    if groups.total() == 0 {
        return vec![catalog.translate("message.no-data")];
    }

    let mut lines = Vec::new();
    let mut current_year = None;
    for bucket in &groups.buckets {
        if current_year != Some(bucket.year()) {
            current_year = Some(bucket.year());
            lines.push(bucket.year().to_string());
        }
        lines.push(format!("  {}", bucket.month_label()));
        lines.extend(
            bucket
                .resources
                .iter()
                .map(|resource| format!("    {}", format_resource_line(resource))),
        );
    }

    if !groups.orphaned.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} ({})",
            catalog.translate("resource.unused-resources"),
            groups.orphaned.len()
        ));
        lines.extend(
            groups
                .orphaned
                .iter()
                .map(|resource| format!("    {}", format_resource_line(resource))),
        );
    }

    lines
}

pub fn format_report_lines(report: &DeletionReport, catalog: &Catalog) -> Vec<String> {
    let deleted = catalog.translate("resource.deleted");
    let failed = catalog.translate("resource.delete-failed");

    report
        .deleted
        .iter()
        .map(|id| format!("{deleted} #{id}"))
        .chain(
            report
                .failed
                .iter()
                .map(|failure| format!("{failed} #{}: {}", failure.id, failure.error)),
        )
        .collect()
}
