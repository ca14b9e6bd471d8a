//! Typed host contracts for the installability/update layer of the web app.
//!
//! This crate is the API-first boundary between the PWA coordinator and the browser. It exposes
//! environment probing, key/value persistence, install-prompt capture, service-worker updates,
//! DOM event emission, timers, and diagnostics as object-safe traits. Concrete browser adapters
//! live in `pwa_host_web`; every contract here also ships a no-op adapter (server rendering,
//! unsupported hosts) and an in-memory adapter (tests and local simulation).

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod diagnostics;
pub mod environment;
pub mod events;
pub mod host;
pub mod install_prompt;
pub mod memory;
pub mod scheduler;
pub mod storage;
pub mod time;
pub mod updates;

pub use diagnostics::DiagnosticsPort;
pub use environment::{
    EnvironmentSource, EnvironmentSnapshot, MemoryEnvironmentSource, NoopEnvironmentSource,
    PageLocation,
};
pub use events::{MemoryPwaEventSink, NoopPwaEventSink, PwaEvent, PwaEventSink};
pub use host::{HostStrategy, PwaHostServices};
pub use install_prompt::{
    InstallChoice, InstallPromptFuture, InstallPromptHandle, InstallPromptListeners,
    InstallPromptSource, MemoryInstallPromptSource, NoopInstallPromptSource,
    SimulatedInstallPrompt,
};
pub use memory::MemoryHost;
pub use scheduler::{MemoryTaskScheduler, NoopTaskScheduler, SpawnedTask, TaskScheduler, TimerId};
pub use storage::{MemoryPwaStore, NoopPwaStore, PwaStore};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
pub use updates::{MemoryUpdateSource, NoopUpdateSource, UpdateFuture, UpdateSource, VersionEvent};
