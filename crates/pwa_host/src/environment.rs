//! Browser environment probing contracts.
//!
//! Every source method returns the raw platform fact as of the call. Nothing is cached: viewport
//! width, visibility, and display mode change while the page is open.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

/// Parts of `window.location` consulted by the platform heuristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    /// Host name without port (`localhost`, `example.com`).
    pub hostname: String,
    /// Scheme including the trailing colon (`https:`, `file:`).
    pub protocol: String,
    /// Port string, empty when the default port is used.
    pub port: String,
    /// Query string including the leading `?`, empty when absent.
    pub search: String,
    /// Full page URL.
    pub href: String,
}

impl PageLocation {
    /// Builds a location from a scheme, host, port, and query string.
    pub fn new(protocol: &str, hostname: &str, port: &str, search: &str) -> Self {
        let authority = if port.is_empty() {
            hostname.to_string()
        } else {
            format!("{hostname}:{port}")
        };
        Self {
            hostname: hostname.to_string(),
            protocol: protocol.to_string(),
            port: port.to_string(),
            search: search.to_string(),
            href: format!("{protocol}//{authority}/{search}"),
        }
    }
}

/// Host service answering questions about the runtime environment.
pub trait EnvironmentSource {
    /// Returns whether a browser window and document are reachable.
    fn is_browser(&self) -> bool;

    /// Returns the raw `navigator.userAgent` string (empty when unavailable).
    fn user_agent(&self) -> String;

    /// Returns `window.innerWidth` in CSS pixels.
    fn viewport_width(&self) -> Option<f64>;

    /// Returns whether touch input is advertised (`ontouchstart` or `maxTouchPoints > 0`).
    fn has_touch_support(&self) -> bool;

    /// Returns the browser's `isSecureContext` flag.
    fn secure_context_flag(&self) -> bool;

    /// Returns the current page location.
    fn location(&self) -> Option<PageLocation>;

    /// Returns whether the `(display-mode: standalone)` media query matches.
    fn display_mode_standalone(&self) -> bool;

    /// Returns the iOS-only `navigator.standalone` flag.
    fn navigator_standalone(&self) -> bool;

    /// Returns whether `navigator.serviceWorker` exists.
    fn has_service_worker_api(&self) -> bool;

    /// Returns whether the document head links a non-empty web app manifest.
    fn has_manifest_link(&self) -> bool;

    /// Returns `document.hidden`.
    fn is_document_hidden(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
/// Source for non-browser hosts (server rendering, native test binaries).
pub struct NoopEnvironmentSource;

impl EnvironmentSource for NoopEnvironmentSource {
    fn is_browser(&self) -> bool {
        false
    }

    fn user_agent(&self) -> String {
        String::new()
    }

    fn viewport_width(&self) -> Option<f64> {
        None
    }

    fn has_touch_support(&self) -> bool {
        false
    }

    fn secure_context_flag(&self) -> bool {
        false
    }

    fn location(&self) -> Option<PageLocation> {
        None
    }

    fn display_mode_standalone(&self) -> bool {
        false
    }

    fn navigator_standalone(&self) -> bool {
        false
    }

    fn has_service_worker_api(&self) -> bool {
        false
    }

    fn has_manifest_link(&self) -> bool {
        false
    }

    fn is_document_hidden(&self) -> bool {
        true
    }
}

/// Plain-data description of a browser environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// See [`EnvironmentSource::is_browser`].
    pub is_browser: bool,
    /// See [`EnvironmentSource::user_agent`].
    pub user_agent: String,
    /// See [`EnvironmentSource::viewport_width`].
    pub viewport_width: Option<f64>,
    /// See [`EnvironmentSource::has_touch_support`].
    pub touch_support: bool,
    /// See [`EnvironmentSource::secure_context_flag`].
    pub secure_context: bool,
    /// See [`EnvironmentSource::location`].
    pub location: Option<PageLocation>,
    /// See [`EnvironmentSource::display_mode_standalone`].
    pub display_mode_standalone: bool,
    /// See [`EnvironmentSource::navigator_standalone`].
    pub navigator_standalone: bool,
    /// See [`EnvironmentSource::has_service_worker_api`].
    pub service_worker_api: bool,
    /// See [`EnvironmentSource::has_manifest_link`].
    pub manifest_link: bool,
    /// See [`EnvironmentSource::is_document_hidden`].
    pub document_hidden: bool,
}

impl Default for EnvironmentSnapshot {
    fn default() -> Self {
        Self {
            is_browser: false,
            user_agent: String::new(),
            viewport_width: None,
            touch_support: false,
            secure_context: false,
            location: None,
            display_mode_standalone: false,
            navigator_standalone: false,
            service_worker_api: false,
            manifest_link: false,
            document_hidden: true,
        }
    }
}

impl EnvironmentSnapshot {
    /// A visible, secure browser page on `https://{hostname}` with service worker and manifest.
    pub fn browser(user_agent: &str, hostname: &str, viewport_width: f64) -> Self {
        Self {
            is_browser: true,
            user_agent: user_agent.to_string(),
            viewport_width: Some(viewport_width),
            touch_support: false,
            secure_context: true,
            location: Some(PageLocation::new("https:", hostname, "", "")),
            display_mode_standalone: false,
            navigator_standalone: false,
            service_worker_api: true,
            manifest_link: true,
            document_hidden: false,
        }
    }
}

impl EnvironmentSource for EnvironmentSnapshot {
    fn is_browser(&self) -> bool {
        self.is_browser
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn viewport_width(&self) -> Option<f64> {
        self.viewport_width
    }

    fn has_touch_support(&self) -> bool {
        self.touch_support
    }

    fn secure_context_flag(&self) -> bool {
        self.secure_context
    }

    fn location(&self) -> Option<PageLocation> {
        self.location.clone()
    }

    fn display_mode_standalone(&self) -> bool {
        self.display_mode_standalone
    }

    fn navigator_standalone(&self) -> bool {
        self.navigator_standalone
    }

    fn has_service_worker_api(&self) -> bool {
        self.service_worker_api
    }

    fn has_manifest_link(&self) -> bool {
        self.manifest_link
    }

    fn is_document_hidden(&self) -> bool {
        self.document_hidden
    }
}

#[derive(Debug, Clone, Default)]
/// Mutable in-memory source; clones share the same snapshot.
pub struct MemoryEnvironmentSource {
    inner: Rc<RefCell<EnvironmentSnapshot>>,
}

impl MemoryEnvironmentSource {
    /// Creates a source answering from `snapshot`.
    pub fn new(snapshot: EnvironmentSnapshot) -> Self {
        Self {
            inner: Rc::new(RefCell::new(snapshot)),
        }
    }

    /// Mutates the shared snapshot in place.
    pub fn update(&self, apply: impl FnOnce(&mut EnvironmentSnapshot)) {
        apply(&mut self.inner.borrow_mut());
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        self.inner.borrow().clone()
    }
}

impl EnvironmentSource for MemoryEnvironmentSource {
    fn is_browser(&self) -> bool {
        self.inner.borrow().is_browser()
    }

    fn user_agent(&self) -> String {
        self.inner.borrow().user_agent()
    }

    fn viewport_width(&self) -> Option<f64> {
        self.inner.borrow().viewport_width()
    }

    fn has_touch_support(&self) -> bool {
        self.inner.borrow().has_touch_support()
    }

    fn secure_context_flag(&self) -> bool {
        self.inner.borrow().secure_context_flag()
    }

    fn location(&self) -> Option<PageLocation> {
        self.inner.borrow().location()
    }

    fn display_mode_standalone(&self) -> bool {
        self.inner.borrow().display_mode_standalone()
    }

    fn navigator_standalone(&self) -> bool {
        self.inner.borrow().navigator_standalone()
    }

    fn has_service_worker_api(&self) -> bool {
        self.inner.borrow().has_service_worker_api()
    }

    fn has_manifest_link(&self) -> bool {
        self.inner.borrow().has_manifest_link()
    }

    fn is_document_hidden(&self) -> bool {
        self.inner.borrow().is_document_hidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_location_builds_href_with_and_without_port() {
        let plain = PageLocation::new("https:", "example.com", "", "?a=1");
        assert_eq!(plain.href, "https://example.com/?a=1");

        let dev = PageLocation::new("http:", "localhost", "4200", "");
        assert_eq!(dev.href, "http://localhost:4200/");
        assert_eq!(dev.port, "4200");
    }

    #[test]
    fn memory_source_clones_observe_updates() {
        let source = MemoryEnvironmentSource::new(EnvironmentSnapshot::browser(
            "Mozilla/5.0",
            "example.com",
            1280.0,
        ));
        let observer = source.clone();
        assert!(!observer.is_document_hidden());

        source.update(|snapshot| snapshot.document_hidden = true);
        assert!(observer.is_document_hidden());
    }

    #[test]
    fn noop_source_reports_no_browser() {
        let source = NoopEnvironmentSource;
        assert!(!source.is_browser());
        assert!(source.location().is_none());
        assert!(!source.has_service_worker_api());
    }
}
