//! Confirm-then-delete flow for resources not attached to any memo.

use std::collections::HashSet;

use serde::Serialize;

use crate::api::ResourceService;
use crate::dialog::{ConfirmDialog, ConfirmRequest, DialogSeverity};
use crate::models::{Resource, ResourceId};

use super::grouping::{group_resources, ResourceGroups};

pub const DELETE_UNUSED_DIALOG: &str = "delete-unused-resources-dialog";
pub const DELETE_UNUSED_TITLE: &str = "Delete all unused resources";
pub const DELETE_UNUSED_CONTENT: &str =
    "Are you sure to delete all unused resources? This action cannot be undone.";

/// A delete call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDeletion {
    pub id: ResourceId,
    pub error: String,
}

/// Per-resource results of a bulk delete, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeletionReport {
    pub deleted: Vec<ResourceId>,
    pub failed: Vec<FailedDeletion>,
}

impl DeletionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// There were no unused resources; the user was not asked.
    NothingToDelete,
    /// The user declined; nothing was deleted.
    Declined,
    Completed(DeletionReport),
}

/// Holds the displayed resource snapshot and deletes its orphaned subset.
#[derive(Debug, Clone)]
pub struct UnusedResourceCleaner {
    resources: Vec<Resource>,
    request: ConfirmRequest,
}

impl UnusedResourceCleaner {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            request: ConfirmRequest {
                name: DELETE_UNUSED_DIALOG,
                title: DELETE_UNUSED_TITLE.to_string(),
                content: DELETE_UNUSED_CONTENT.to_string(),
                severity: DialogSeverity::Warning,
            },
        }
    }

    /// Replace the English prompt text, e.g. with translated strings.
    #[must_use]
    pub fn with_prompt(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.request.title = title.into();
        self.request.content = content.into();
        self
    }

    /// The currently displayed resources.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn groups(&self) -> ResourceGroups {
        group_resources(&self.resources)
    }

    pub fn unused(&self) -> Vec<Resource> {
        self.groups().orphaned
    }

    /// Ask for confirmation, then delete every unused resource one at a time.
    ///
    /// Each delete is awaited before the next starts. A failure does not stop
    /// the sequence; it is recorded and the resource stays in the snapshot.
    /// Successfully deleted resources are dropped from the snapshot without
    /// re-fetching.
    pub async fn delete_unused<D, C>(&mut self, dialog: &D, client: &C) -> CleanupOutcome
    where
        D: ConfirmDialog,
        C: ResourceService,
    {
        let unused = self.unused();
        if unused.is_empty() {
            return CleanupOutcome::NothingToDelete;
        }

        if !dialog.confirm(&self.request).await {
            tracing::info!("Deletion of {} unused resources declined", unused.len());
            return CleanupOutcome::Declined;
        }

        let mut report = DeletionReport::default();
        for resource in &unused {
            match client.delete_resource(resource.id).await {
                Ok(()) => {
                    tracing::debug!("Deleted unused resource {}", resource.id);
                    report.deleted.push(resource.id);
                }
                Err(error) => {
                    tracing::warn!("Failed to delete resource {}: {}", resource.id, error);
                    report.failed.push(FailedDeletion {
                        id: resource.id,
                        error: error.to_string(),
                    });
                }
            }
        }

        let deleted = report.deleted.iter().copied().collect::<HashSet<_>>();
        self.resources
            .retain(|resource| !(resource.is_orphaned() && deleted.contains(&resource.id)));

        tracing::info!(
            "Deleted {} of {} unused resources",
            report.deleted.len(),
            unused.len()
        );
        CleanupOutcome::Completed(report)
    }
}
