//! Resource grouping and cleanup

mod cleanup;
mod grouping;

pub use cleanup::{
    CleanupOutcome, DeletionReport, FailedDeletion, UnusedResourceCleaner, DELETE_UNUSED_CONTENT,
    DELETE_UNUSED_DIALOG, DELETE_UNUSED_TITLE,
};
pub use grouping::{group_resources, month_key, BucketOrder, MonthBucket, ResourceGroups};
