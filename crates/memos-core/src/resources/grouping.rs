//! Month bucketing of resources.
//!
//! Resources linked to a memo are grouped by the UTC month they were created
//! in; unlinked resources are set aside as orphaned. Buckets come out in the
//! order their first resource was encountered. Callers wanting a timeline use
//! [`ResourceGroups::sorted`].

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::models::Resource;

/// Resources created within one UTC calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// First instant of the month
    pub key: DateTime<Utc>,
    pub resources: Vec<Resource>,
}

impl MonthBucket {
    pub fn year(&self) -> i32 {
        self.key.year()
    }

    /// Abbreviated English month name, e.g. `Jan`.
    pub fn month_label(&self) -> String {
        self.key.format("%b").to_string()
    }
}

/// Display order for month buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketOrder {
    /// Most recent month first
    #[default]
    Newest,
    /// Oldest month first
    Oldest,
    /// Order of first appearance in the input
    Encounter,
}

/// Output of [`group_resources`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResourceGroups {
    pub buckets: Vec<MonthBucket>,
    pub orphaned: Vec<Resource>,
}

impl ResourceGroups {
    /// Number of resources across buckets and the orphaned set.
    pub fn total(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.resources.len())
            .sum::<usize>()
            + self.orphaned.len()
    }

    #[must_use]
    pub fn sorted(mut self, order: BucketOrder) -> Self {
        match order {
            BucketOrder::Newest => self.buckets.sort_by(|a, b| b.key.cmp(&a.key)),
            BucketOrder::Oldest => self.buckets.sort_by(|a, b| a.key.cmp(&b.key)),
            BucketOrder::Encounter => {}
        }
        self
    }
}

/// The first instant of the UTC month containing `instant`.
pub fn month_key(instant: DateTime<Utc>) -> DateTime<Utc> {
    let first_day =
        NaiveDate::from_ymd_opt(instant.year(), instant.month(), 1).unwrap_or(instant.date_naive());
    first_day.and_time(NaiveTime::MIN).and_utc()
}

/// Partition `resources` into month buckets and the orphaned remainder.
pub fn group_resources(resources: &[Resource]) -> ResourceGroups {
    let mut groups = ResourceGroups::default();
    let mut bucket_index: HashMap<DateTime<Utc>, usize> = HashMap::new();

    for resource in resources {
        if resource.is_orphaned() {
            groups.orphaned.push(resource.clone());
            continue;
        }

        let key = month_key(resource.created_ts);
        let index = *bucket_index.entry(key).or_insert_with(|| {
            groups.buckets.push(MonthBucket {
                key,
                resources: Vec::new(),
            });
            groups.buckets.len() - 1
        });
        groups.buckets[index].resources.push(resource.clone());
    }

    groups
}
