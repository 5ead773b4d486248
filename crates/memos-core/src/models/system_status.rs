//! Server-reported instance status

use serde::{Deserialize, Serialize};

use super::preferences::{Appearance, Locale, PreferencePatch};
use super::user::User;

/// Branding configured by the instance administrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizedProfile {
    /// Instance name, shown as the document title
    pub name: String,
    /// Favicon URL; empty means the built-in logo
    pub logo_url: String,
    pub description: String,
    /// Default locale for users without a stored preference
    pub locale: String,
    /// Default appearance for users without a stored preference
    pub appearance: String,
}

impl CustomizedProfile {
    /// Server-side preference defaults, ignoring blank or unknown values.
    pub fn preference_defaults(&self) -> PreferencePatch {
        PreferencePatch {
            locale: Locale::parse(&self.locale),
            appearance: self.appearance.parse::<Appearance>().ok(),
        }
    }
}

/// Snapshot returned by the status endpoint. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    /// Instance owner; `None` means the instance has not been set up yet
    pub host: Option<User>,
    /// Raw CSS appended to the document
    pub additional_style: String,
    /// Raw JavaScript appended to the document
    pub additional_script: String,
    pub customized_profile: CustomizedProfile,
    pub allow_sign_up: bool,
    pub disable_password_login: bool,
}

impl SystemStatus {
    pub const fn is_initialized(&self) -> bool {
        self.host.is_some()
    }
}
