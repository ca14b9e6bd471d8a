//! Host strategy and the service bundle injected into the PWA coordinator.

use std::rc::Rc;

use crate::{
    Clock, EnvironmentSource, InstallPromptSource, NoopEnvironmentSource, NoopInstallPromptSource,
    NoopPwaEventSink, NoopPwaStore, NoopTaskScheduler, NoopUpdateSource, PwaEventSink, PwaStore,
    SystemClock, TaskScheduler, UpdateSource,
};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed adapters.
    Browser,
    /// No-op adapters for server rendering and native builds.
    Inert,
    /// In-memory adapters for tests and local simulation.
    Memory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Inert => "inert",
            Self::Memory => "memory",
        }
    }
}

/// Runtime-selected host service bundle injected into the PWA coordinator.
///
/// All environment-specific adapter selection happens before this bundle reaches
/// `pwa_runtime`, which keeps the coordinator free of browser API details.
#[derive(Clone)]
pub struct PwaHostServices {
    /// Environment facts (user agent, viewport, location, display mode).
    pub environment: Rc<dyn EnvironmentSource>,
    /// Persistent key/value storage.
    pub store: Rc<dyn PwaStore>,
    /// Native install-prompt signals.
    pub install_prompts: Rc<dyn InstallPromptSource>,
    /// Service-worker update mechanism.
    pub updates: Rc<dyn UpdateSource>,
    /// Page-level event broadcasting.
    pub events: Rc<dyn PwaEventSink>,
    /// Timers and local task spawning.
    pub scheduler: Rc<dyn TaskScheduler>,
    /// Wall clock for cooldowns.
    pub clock: Rc<dyn Clock>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl PwaHostServices {
    /// Bundle of no-op adapters: no browser, no storage, no signals.
    pub fn inert() -> Self {
        Self {
            environment: Rc::new(NoopEnvironmentSource),
            store: Rc::new(NoopPwaStore),
            install_prompts: Rc::new(NoopInstallPromptSource),
            updates: Rc::new(NoopUpdateSource),
            events: Rc::new(NoopPwaEventSink),
            scheduler: Rc::new(NoopTaskScheduler),
            clock: Rc::new(SystemClock),
            host_strategy: HostStrategy::Inert,
        }
    }
}
