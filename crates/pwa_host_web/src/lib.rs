//! Browser (`wasm32`) implementations of [`pwa_host`] contracts.
//!
//! This crate is the concrete browser-side wiring layer for environment probing, localStorage,
//! install-prompt capture, service-worker updates, DOM event dispatch, timers, and the
//! development `window.pwaDebug` global. On non-wasm targets every adapter compiles and
//! degrades to inert behaviour so the crate can be tested natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod diagnostics;
pub mod environment;
pub mod events;
pub mod install_prompt;
pub mod scheduler;
pub mod storage;
pub mod updates;

pub use adapters::{
    build_pwa_host_services, environment_source, event_sink, host_strategy_name,
    install_prompt_source, pwa_store, selected_host_strategy, task_scheduler, update_source,
    EnvironmentSourceAdapter, InstallPromptSourceAdapter, PwaEventSinkAdapter, PwaStoreAdapter,
    TaskSchedulerAdapter, UpdateSourceAdapter,
};
pub use diagnostics::install_debug_global;
pub use environment::WebEnvironmentSource;
pub use events::WebPwaEventSink;
pub use install_prompt::WebInstallPromptSource;
pub use scheduler::WebTaskScheduler;
pub use storage::local_store::WebPwaStore;
pub use updates::WebUpdateSource;
