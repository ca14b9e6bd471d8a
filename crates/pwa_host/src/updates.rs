//! Service-worker update contracts.

use std::{
    cell::{Cell, RefCell},
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

/// Object-safe boxed future used by [`UpdateSource`].
pub type UpdateFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Version-lifecycle events reported by the update mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionEvent {
    /// A new version was found and is being downloaded.
    VersionDetected,
    /// A new version is installed and waiting to be activated.
    VersionReady,
    /// Downloading or installing the new version failed.
    VersionInstallationFailed {
        /// Failure description from the platform.
        error: String,
    },
    /// A check completed without finding a new version.
    NoNewVersionDetected,
}

impl VersionEvent {
    /// Returns the stable wire tag of the event.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::VersionDetected => "VERSION_DETECTED",
            Self::VersionReady => "VERSION_READY",
            Self::VersionInstallationFailed { .. } => "VERSION_INSTALLATION_FAILED",
            Self::NoNewVersionDetected => "NO_NEW_VERSION_DETECTED",
        }
    }
}

/// Host service wrapping the service-worker update mechanism.
pub trait UpdateSource {
    /// Returns whether updates are managed at all on this host.
    fn is_enabled(&self) -> bool;

    /// Registers `on_event` for version-lifecycle events for the lifetime of the page.
    fn listen(&self, on_event: Rc<dyn Fn(VersionEvent)>) -> Result<(), String>;

    /// Asks the platform to look for a newer version. Resolves `true` when one was found.
    fn check_for_update(&self) -> UpdateFuture<'_, Result<bool, String>>;

    /// Activates a waiting version. Resolves `true` when a version was activated.
    fn activate_update(&self) -> UpdateFuture<'_, Result<bool, String>>;

    /// Reloads the page so the activated bundle is served.
    fn reload_page(&self);
}

#[derive(Debug, Clone, Copy, Default)]
/// Update source for hosts without service workers.
pub struct NoopUpdateSource;

impl UpdateSource for NoopUpdateSource {
    fn is_enabled(&self) -> bool {
        false
    }

    fn listen(&self, _on_event: Rc<dyn Fn(VersionEvent)>) -> Result<(), String> {
        Ok(())
    }

    fn check_for_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        Box::pin(async { Ok(false) })
    }

    fn activate_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        Box::pin(async { Ok(false) })
    }

    fn reload_page(&self) {}
}

struct MemoryUpdateState {
    enabled: Cell<bool>,
    listeners: RefCell<Vec<Rc<dyn Fn(VersionEvent)>>>,
    check_result: RefCell<Result<bool, String>>,
    activate_result: RefCell<Result<bool, String>>,
    check_calls: Cell<u32>,
    activate_calls: Cell<u32>,
    reloads: Cell<u32>,
}

impl Default for MemoryUpdateState {
    fn default() -> Self {
        Self {
            enabled: Cell::new(true),
            listeners: RefCell::new(Vec::new()),
            check_result: RefCell::new(Ok(false)),
            activate_result: RefCell::new(Ok(true)),
            check_calls: Cell::new(0),
            activate_calls: Cell::new(0),
            reloads: Cell::new(0),
        }
    }
}

#[derive(Clone, Default)]
/// Scripted update source that counts calls; clones share state.
pub struct MemoryUpdateSource {
    inner: Rc<MemoryUpdateState>,
}

impl MemoryUpdateSource {
    /// Enables or disables the source.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    /// Scripts the result of the next update checks.
    pub fn set_check_result(&self, result: Result<bool, String>) {
        *self.inner.check_result.borrow_mut() = result;
    }

    /// Scripts the result of the next activations.
    pub fn set_activate_result(&self, result: Result<bool, String>) {
        *self.inner.activate_result.borrow_mut() = result;
    }

    /// Delivers `event` to every registered listener.
    pub fn emit(&self, event: VersionEvent) {
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(event.clone());
        }
    }

    /// Returns how many listeners were registered.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Returns how many update checks ran.
    pub fn check_calls(&self) -> u32 {
        self.inner.check_calls.get()
    }

    /// Returns how many activations ran.
    pub fn activate_calls(&self) -> u32 {
        self.inner.activate_calls.get()
    }

    /// Returns how many page reloads were requested.
    pub fn reloads(&self) -> u32 {
        self.inner.reloads.get()
    }
}

impl UpdateSource for MemoryUpdateSource {
    fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    fn listen(&self, on_event: Rc<dyn Fn(VersionEvent)>) -> Result<(), String> {
        self.inner.listeners.borrow_mut().push(on_event);
        Ok(())
    }

    fn check_for_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        self.inner.check_calls.set(self.inner.check_calls.get() + 1);
        let result = self.inner.check_result.borrow().clone();
        Box::pin(async move { result })
    }

    fn activate_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        self.inner
            .activate_calls
            .set(self.inner.activate_calls.get() + 1);
        let result = self.inner.activate_result.borrow().clone();
        Box::pin(async move { result })
    }

    fn reload_page(&self) {
        self.inner.reloads.set(self.inner.reloads.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn version_events_use_screaming_snake_type_tags() {
        let ready: VersionEvent =
            serde_json::from_str(r#"{"type":"VERSION_READY"}"#).expect("parse ready");
        assert_eq!(ready, VersionEvent::VersionReady);
        assert_eq!(ready.tag(), "VERSION_READY");

        let failed = VersionEvent::VersionInstallationFailed {
            error: "quota".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&failed).expect("serialize"),
            r#"{"type":"VERSION_INSTALLATION_FAILED","error":"quota"}"#
        );
    }

    #[test]
    fn memory_source_scripts_results_and_counts_calls() {
        let source = MemoryUpdateSource::default();
        source.set_check_result(Err("offline".to_string()));
        assert_eq!(
            block_on(source.check_for_update()),
            Err("offline".to_string())
        );
        assert_eq!(block_on(source.activate_update()), Ok(true));
        source.reload_page();

        assert_eq!(source.check_calls(), 1);
        assert_eq!(source.activate_calls(), 1);
        assert_eq!(source.reloads(), 1);
    }

    #[test]
    fn noop_source_is_disabled() {
        let source = NoopUpdateSource;
        assert!(!source.is_enabled());
        assert_eq!(block_on(source.check_for_update()), Ok(false));
    }
}
