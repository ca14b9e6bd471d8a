//! Installability and update coordination for the web app.
//!
//! [`PwaCoordinator`] turns platform signals (install prompt capture, service-worker version
//! events, user-agent heuristics, persisted cooldowns) into three Leptos signals. The
//! [`components`] module renders prompts from those flags. Host access goes exclusively
//! through the `pwa_host` contracts injected at construction.

pub mod capture;
pub mod components;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod platform;
pub mod storage;
pub mod update_channel;

pub use capture::{CaptureState, InstallPromptCapture};
pub use components::{
    InstallFab, InstallPromptVariant, InstallSnackbarFlow, PwaContext, PwaPrompts, PwaProvider,
    ReminderSnackbar, ToastHost, UpdateBanner,
};
pub use config::{PwaConfig, PwaMode, PwaProfile};
pub use coordinator::{DebugInfo, PwaCoordinator};
pub use error::{InstallOutcome, InstallRejection, PwaError};
pub use platform::{AppInstallState, PlatformKind};
pub use update_channel::UpdateChannel;
