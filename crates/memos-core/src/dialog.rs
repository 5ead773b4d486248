//! Confirmation surface for destructive actions

use serde::Serialize;

/// Visual weight of a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialogSeverity {
    #[default]
    Info,
    Warning,
    Danger,
}

impl DialogSeverity {
    /// Marker shown before the title. Informational prompts have none.
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Warning => Some("warning"),
            Self::Danger => Some("danger"),
        }
    }
}

/// What the user is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmRequest {
    /// Stable identifier of the dialog
    pub name: &'static str,
    pub title: String,
    pub content: String,
    pub severity: DialogSeverity,
}

/// Presents a confirmation and reports whether the user approved it.
#[allow(async_fn_in_trait)]
pub trait ConfirmDialog {
    /// Resolve to `true` only on explicit approval.
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_info_has_no_label() {
        assert_eq!(DialogSeverity::default().label(), None);
        assert_eq!(DialogSeverity::Warning.label(), Some("warning"));
        assert_eq!(DialogSeverity::Danger.label(), Some("danger"));
    }
}
