//! Uploaded resource model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::lenient_i64;

/// Server-assigned resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub i32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().trim_start_matches('#').parse()?))
    }
}

/// Identifier of the memo a resource is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(pub i32);

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded file, optionally linked to a memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    #[serde(default)]
    pub filename: String,
    pub created_ts: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_id: Option<MemoId>,
    #[serde(default, rename = "type")]
    pub mime_type: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl Resource {
    pub fn new(id: i32, filename: impl Into<String>, created_ts: DateTime<Utc>) -> Self {
        Self {
            id: ResourceId(id),
            filename: filename.into(),
            created_ts,
            memo_id: None,
            mime_type: String::new(),
            size: 0,
        }
    }

    #[must_use]
    pub const fn with_memo(mut self, memo_id: i32) -> Self {
        self.memo_id = Some(MemoId(memo_id));
        self
    }

    /// The memo this resource belongs to. Memo ids start at 1, so a zero or
    /// negative id counts as no link at all.
    pub fn linked_memo(&self) -> Option<MemoId> {
        self.memo_id.filter(|memo| memo.0 > 0)
    }

    /// A resource not attached to any memo.
    pub fn is_orphaned(&self) -> bool {
        self.linked_memo().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_gateway_payload() {
        let payload = r#"{
            "id": 7,
            "filename": "photo.png",
            "createdTs": "2024-01-15T08:30:00Z",
            "memoId": 12,
            "type": "image/png",
            "size": "2048"
        }"#;

        let resource: Resource = serde_json::from_str(payload).unwrap();
        assert_eq!(resource.id, ResourceId(7));
        assert_eq!(resource.linked_memo(), Some(MemoId(12)));
        assert_eq!(resource.size, 2048);
        assert_eq!(
            resource.created_ts,
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn missing_or_zero_memo_is_orphaned() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(Resource::new(1, "a", created).is_orphaned());
        assert!(Resource::new(2, "b", created).with_memo(0).is_orphaned());
        assert!(!Resource::new(3, "c", created).with_memo(4).is_orphaned());
    }

    #[test]
    fn resource_id_parses_hash_prefix() {
        assert_eq!("#42".parse::<ResourceId>().unwrap(), ResourceId(42));
        assert!("abc".parse::<ResourceId>().is_err());
    }
}
