//! Document environment capabilities.
//!
//! The synchronizer never touches a rendering surface directly. It drives a
//! [`Document`], which a browser shell backs with the live DOM and the CLI
//! backs with [`HeadlessDocument`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::theme::ResolvedMode;

/// Route shown when the instance has no host yet.
pub const SETUP_ROUTE: &str = "/auth/signup";

/// Favicon used when the instance has no custom logo.
pub const DEFAULT_FAVICON: &str = "/logo.png";

/// Mutations the client applies to the document it is rendered in.
///
/// Style and script payloads come from the instance administrator and are
/// injected verbatim. They cross a trust boundary: whatever the server sends
/// runs in the client.
pub trait Document {
    fn set_language(&self, language: &str);
    fn set_title(&self, title: &str);
    fn set_favicon(&self, href: &str);
    /// Append a style node with `css` as its content.
    fn inject_style(&self, css: &str);
    /// Append a script node with `script` as its content.
    fn inject_script(&self, script: &str);
    /// Make `mode` the only active presentation class on the root element.
    fn set_root_class(&self, mode: ResolvedMode);
    fn current_route(&self) -> String;
    fn navigate(&self, route: &str);
}

/// Observable state of a [`HeadlessDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSnapshot {
    pub language: Option<String>,
    pub title: Option<String>,
    pub favicon: Option<String>,
    pub root_classes: Vec<String>,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    pub route: String,
    pub navigations: Vec<String>,
}

impl DocumentSnapshot {
    pub fn active_mode(&self) -> Option<ResolvedMode> {
        [ResolvedMode::Light, ResolvedMode::Dark]
            .into_iter()
            .find(|mode| self.root_classes.iter().any(|class| class == mode.css_class()))
    }
}

/// In-memory document that records every mutation.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    state: Mutex<DocumentSnapshot>,
}

impl HeadlessDocument {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(DocumentSnapshot {
                route: route.into(),
                ..DocumentSnapshot::default()
            }),
        }
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Document for HeadlessDocument {
    fn set_language(&self, language: &str) {
        self.lock().language = Some(language.to_string());
    }

    fn set_title(&self, title: &str) {
        self.lock().title = Some(title.to_string());
    }

    fn set_favicon(&self, href: &str) {
        self.lock().favicon = Some(href.to_string());
    }

    fn inject_style(&self, css: &str) {
        self.lock().styles.push(css.to_string());
    }

    fn inject_script(&self, script: &str) {
        self.lock().scripts.push(script.to_string());
    }

    fn set_root_class(&self, mode: ResolvedMode) {
        let mut state = self.lock();
        let inactive = mode.opposite().css_class();
        state.root_classes.retain(|class| class != inactive);
        if !state.root_classes.iter().any(|class| class == mode.css_class()) {
            state.root_classes.push(mode.css_class().to_string());
        }
    }

    fn current_route(&self) -> String {
        self.lock().route.clone()
    }

    fn navigate(&self, route: &str) {
        let mut state = self.lock();
        state.route = route.to_string();
        state.navigations.push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_class_is_exclusive() {
        let document = HeadlessDocument::new("/");
        document.set_root_class(ResolvedMode::Dark);
        document.set_root_class(ResolvedMode::Light);
        document.set_root_class(ResolvedMode::Light);

        let snapshot = document.snapshot();
        assert_eq!(snapshot.root_classes, vec!["light".to_string()]);
        assert_eq!(snapshot.active_mode(), Some(ResolvedMode::Light));
    }

    #[test]
    fn navigation_updates_route_and_history() {
        let document = HeadlessDocument::new("/");
        document.navigate(SETUP_ROUTE);

        let snapshot = document.snapshot();
        assert_eq!(snapshot.route, SETUP_ROUTE);
        assert_eq!(snapshot.navigations, vec![SETUP_ROUTE.to_string()]);
    }

    #[test]
    fn injections_accumulate_in_order() {
        let document = HeadlessDocument::default();
        document.inject_style("a{}");
        document.inject_style("b{}");
        assert_eq!(document.snapshot().styles, vec!["a{}", "b{}"]);
    }
}
