//! User preference model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Theme preference options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Follow system preference
    #[default]
    System,
    /// Light theme
    Light,
    /// Dark theme
    Dark,
}

impl Appearance {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Appearance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::InvalidInput(format!(
                "unknown appearance '{other}' (expected system, light or dark)"
            ))),
        }
    }
}

/// A BCP 47 language tag such as `en` or `zh-Hans`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub const DEFAULT: &'static str = "en";

    /// Parse a language tag, returning `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag (`zh` for `zh-Hans`).
    pub fn language(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Interface language
    pub locale: Locale,
    /// Theme preference
    pub appearance: Appearance,
}

impl Preferences {
    /// Fill unset stored values from the server-provided defaults, then from
    /// the built-in defaults.
    pub fn resolve(stored: &PreferencePatch, server_defaults: &PreferencePatch) -> Self {
        Self {
            locale: stored
                .locale
                .clone()
                .or_else(|| server_defaults.locale.clone())
                .unwrap_or_default(),
            appearance: stored
                .appearance
                .or(server_defaults.appearance)
                .unwrap_or_default(),
        }
    }
}

/// A partial preference write. Only the fields that are set get persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferencePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<Appearance>,
}

impl PreferencePatch {
    pub const fn locale(locale: Locale) -> Self {
        Self {
            locale: Some(locale),
            appearance: None,
        }
    }

    pub const fn appearance(appearance: Appearance) -> Self {
        Self {
            locale: None,
            appearance: Some(appearance),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.locale.is_none() && self.appearance.is_none()
    }

    /// Overlay `other` on top of `self`, keeping the newest value per field.
    pub fn merge(&mut self, other: Self) {
        if other.locale.is_some() {
            self.locale = other.locale;
        }
        if other.appearance.is_some() {
            self.appearance = other.appearance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_default() {
        let preferences = Preferences::default();
        assert_eq!(preferences.locale.as_str(), "en");
        assert_eq!(preferences.appearance, Appearance::System);
    }

    #[test]
    fn appearance_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Appearance>().unwrap(), Appearance::Dark);
        assert_eq!(" system ".parse::<Appearance>().unwrap(), Appearance::System);
        assert!("sepia".parse::<Appearance>().is_err());
    }

    #[test]
    fn appearance_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Appearance::Light).unwrap(), "\"light\"");
    }

    #[test]
    fn locale_rejects_blank_and_exposes_language() {
        assert!(Locale::parse("  ").is_none());
        let locale = Locale::parse("zh-Hans").unwrap();
        assert_eq!(locale.language(), "zh");
    }

    #[test]
    fn resolve_prefers_stored_then_server_then_builtin() {
        let stored = PreferencePatch::appearance(Appearance::Dark);
        let server = PreferencePatch {
            locale: Locale::parse("fr"),
            appearance: Some(Appearance::Light),
        };

        let resolved = Preferences::resolve(&stored, &server);
        assert_eq!(resolved.appearance, Appearance::Dark);
        assert_eq!(resolved.locale.as_str(), "fr");

        let fallback = Preferences::resolve(&PreferencePatch::default(), &PreferencePatch::default());
        assert_eq!(fallback, Preferences::default());
    }

    #[test]
    fn merge_keeps_latest_value_per_field() {
        let mut patch = PreferencePatch::locale(Locale::parse("en").unwrap());
        patch.merge(PreferencePatch::appearance(Appearance::Dark));
        patch.merge(PreferencePatch::locale(Locale::parse("de").unwrap()));

        assert_eq!(patch.locale.as_ref().map(Locale::as_str), Some("de"));
        assert_eq!(patch.appearance, Some(Appearance::Dark));
    }
}
