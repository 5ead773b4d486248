//! Appearance resolution and desktop color-scheme detection

use serde::{Deserialize, Serialize};

use crate::models::Appearance;

/// Concrete mode applied to the document (never `system`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedMode {
    #[default]
    Light,
    Dark,
}

impl ResolvedMode {
    pub const fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Class name toggled on the document root
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Resolve an appearance preference to an actual light/dark mode
pub const fn resolve_mode(appearance: Appearance, system_prefers_dark: bool) -> ResolvedMode {
    match appearance {
        Appearance::Light => ResolvedMode::Light,
        Appearance::Dark => ResolvedMode::Dark,
        Appearance::System => ResolvedMode::from_dark(system_prefers_dark),
    }
}

/// Detect the desktop dark mode preference.
///
/// This may spawn a subprocess, so callers polling it should do so off the
/// async executor.
pub fn detect_system_dark_mode() -> bool {
    let detected = platform_prefers_dark();
    tracing::debug!(
        "System color scheme detected: {}",
        match detected {
            Some(true) => "dark",
            Some(false) => "light",
            None => "unknown, using light",
        }
    );
    detected.unwrap_or(false)
}

#[cfg(target_os = "windows")]
fn platform_prefers_dark() -> Option<bool> {
    probe_command(
        "reg",
        &[
            "query",
            r"HKCU\SOFTWARE\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ],
    )
    .and_then(|stdout| parse_registry_light_theme(&stdout))
}

#[cfg(target_os = "macos")]
fn platform_prefers_dark() -> Option<bool> {
    // The key is absent in light mode, so a failed read still means light.
    Some(
        probe_command("defaults", &["read", "-g", "AppleInterfaceStyle"])
            .is_some_and(|stdout| parse_apple_interface_style(&stdout)),
    )
}

#[cfg(target_os = "linux")]
fn platform_prefers_dark() -> Option<bool> {
    probe_command(
        "gsettings",
        &["get", "org.gnome.desktop.interface", "color-scheme"],
    )
    .and_then(|stdout| parse_gnome_color_scheme(&stdout))
    .or_else(|| std::env::var("GTK_THEME").ok().map(|theme| gtk_theme_is_dark(&theme)))
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn platform_prefers_dark() -> Option<bool> {
    None
}

/// Run a probe command and return its stdout when it exits successfully.
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
fn probe_command(program: &str, args: &[&str]) -> Option<String> {
    match std::process::Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(_) => None,
        Err(error) => {
            tracing::debug!("Color scheme probe `{}` unavailable: {}", program, error);
            None
        }
    }
}

/// `AppsUseLightTheme` is `0x0` in dark mode and `0x1` in light mode.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_registry_light_theme(stdout: &str) -> Option<bool> {
    let value = stdout
        .lines()
        .find(|line| line.contains("AppsUseLightTheme"))?
        .split_whitespace()
        .last()?;
    match value {
        "0x0" => Some(true),
        "0x1" => Some(false),
        _ => None,
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_apple_interface_style(stdout: &str) -> bool {
    stdout.trim().eq_ignore_ascii_case("dark")
}

/// `gsettings` prints a quoted enum such as `'prefer-dark'`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_gnome_color_scheme(stdout: &str) -> Option<bool> {
    match stdout.trim().trim_matches('\'') {
        "prefer-dark" => Some(true),
        "prefer-light" => Some(false),
        _ => None,
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn gtk_theme_is_dark(theme: &str) -> bool {
    theme.to_lowercase().contains("dark")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_appearance_follows_os_signal() {
        assert_eq!(resolve_mode(Appearance::System, true), ResolvedMode::Dark);
        assert_eq!(resolve_mode(Appearance::System, false), ResolvedMode::Light);
    }

    #[test]
    fn explicit_appearance_ignores_os_signal() {
        for os_dark in [true, false] {
            assert_eq!(resolve_mode(Appearance::Light, os_dark), ResolvedMode::Light);
            assert_eq!(resolve_mode(Appearance::Dark, os_dark), ResolvedMode::Dark);
        }
    }

    #[test]
    fn registry_output_is_parsed() {
        let dark = "\r\nHKEY_CURRENT_USER\\...\\Personalize\r\n    AppsUseLightTheme    REG_DWORD    0x0\r\n";
        let light = "    AppsUseLightTheme    REG_DWORD    0x1\n";
        assert_eq!(parse_registry_light_theme(dark), Some(true));
        assert_eq!(parse_registry_light_theme(light), Some(false));
        assert_eq!(parse_registry_light_theme("ERROR: not found"), None);
    }

    #[test]
    fn gnome_color_scheme_is_parsed() {
        assert_eq!(parse_gnome_color_scheme("'prefer-dark'\n"), Some(true));
        assert_eq!(parse_gnome_color_scheme("'prefer-light'"), Some(false));
        assert_eq!(parse_gnome_color_scheme("'default'"), None);
    }

    #[test]
    fn theme_names_are_matched_case_insensitively() {
        assert!(gtk_theme_is_dark("Adwaita:Dark"));
        assert!(!gtk_theme_is_dark("Adwaita"));
        assert!(parse_apple_interface_style("Dark\n"));
        assert!(!parse_apple_interface_style(""));
    }

    #[test]
    fn css_class_matches_mode() {
        assert_eq!(ResolvedMode::Dark.css_class(), "dark");
        assert_eq!(ResolvedMode::Light.opposite(), ResolvedMode::Dark);
    }
}
