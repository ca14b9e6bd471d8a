//! Timing profiles for the coordinator and prompt components.
//!
//! `pwa.config.toml` is validated at build time and embedded as JSON. The profile in effect is
//! picked from [`PwaMode`], which the composition root derives once from the page location.

use std::time::Duration;

use leptos::logging::warn;
use pwa_host::{EnvironmentSource, InstallChoice};
use serde::{Deserialize, Serialize};

use crate::platform;

include!(concat!(env!("OUT_DIR"), "/pwa_config_generated.rs"));

/// Whether the app runs on a developer machine or a deployed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PwaMode {
    /// Production timings and the full heuristic gates.
    Production,
    /// Short cooldowns, simulated installs, and the debug surface.
    Development,
}

impl PwaMode {
    /// Development on `localhost`, `127.0.0.1`, or port 4200; production otherwise.
    pub fn detect(environment: &dyn EnvironmentSource) -> Self {
        if platform::is_local_development(environment) {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Returns whether this is [`PwaMode::Development`].
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Returns a stable token for logs and diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

/// One timing profile. Durations are stored in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwaProfile {
    /// Minimum time between two install reminders.
    pub reminder_cooldown_ms: u64,
    /// Delay between scheduling and showing the reminder.
    pub reminder_delay_ms: u64,
    /// First visit number on which the production reminder may appear.
    pub reminder_min_visits: u32,
    /// Minimum time between a dismissed install prompt and the next automatic one.
    pub install_prompt_cooldown_ms: u64,
    /// Period of the active update check while the page is visible.
    pub update_poll_interval_ms: u64,
    /// Period of the prompt components' installability re-check.
    pub install_recheck_interval_ms: u64,
    /// Delay before the snackbar flow prompts on its own.
    pub auto_prompt_delay_ms: u64,
    /// Delay before the floating install button appears.
    pub fab_reveal_delay_ms: u64,
    /// Delay before the development status dump.
    pub debug_log_delay_ms: u64,
    /// Lifetime of transient toast messages.
    pub toast_duration_ms: u64,
    /// Outcome of the development-mode simulated install prompt.
    pub simulated_install_choice: InstallChoice,
}

impl PwaProfile {
    /// Built-in production profile.
    pub fn production() -> Self {
        Self {
            reminder_cooldown_ms: 24 * 60 * 60 * 1000,
            reminder_delay_ms: 60_000,
            reminder_min_visits: 2,
            install_prompt_cooldown_ms: 24 * 60 * 60 * 1000,
            update_poll_interval_ms: 30 * 60 * 1000,
            install_recheck_interval_ms: 5_000,
            auto_prompt_delay_ms: 45_000,
            fab_reveal_delay_ms: 30_000,
            debug_log_delay_ms: 3_000,
            toast_duration_ms: 4_000,
            simulated_install_choice: InstallChoice::Accepted,
        }
    }

    /// Built-in development profile.
    pub fn development() -> Self {
        Self {
            reminder_cooldown_ms: 5_000,
            reminder_delay_ms: 3_000,
            install_prompt_cooldown_ms: 5_000,
            ..Self::production()
        }
    }

    pub fn reminder_cooldown(&self) -> Duration {
        Duration::from_millis(self.reminder_cooldown_ms)
    }

    pub fn reminder_delay(&self) -> Duration {
        Duration::from_millis(self.reminder_delay_ms)
    }

    pub fn install_prompt_cooldown(&self) -> Duration {
        Duration::from_millis(self.install_prompt_cooldown_ms)
    }

    pub fn update_poll_interval(&self) -> Duration {
        Duration::from_millis(self.update_poll_interval_ms)
    }

    pub fn install_recheck_interval(&self) -> Duration {
        Duration::from_millis(self.install_recheck_interval_ms)
    }

    pub fn auto_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.auto_prompt_delay_ms)
    }

    pub fn fab_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.fab_reveal_delay_ms)
    }

    pub fn debug_log_delay(&self) -> Duration {
        Duration::from_millis(self.debug_log_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Both timing profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwaConfig {
    /// Config file schema version.
    pub schema_version: u32,
    /// Profile for deployed hosts.
    pub production: PwaProfile,
    /// Profile for local development.
    pub development: PwaProfile,
}

impl Default for PwaConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            production: PwaProfile::production(),
            development: PwaProfile::development(),
        }
    }
}

impl PwaConfig {
    /// Parses the build-time embedded profiles, falling back to the built-in ones.
    pub fn embedded() -> Self {
        Self::from_json(PWA_CONFIG_JSON).unwrap_or_else(|err| {
            warn!("embedded pwa config unreadable, using defaults: {err}");
            Self::default()
        })
    }

    /// Parses profiles from their JSON form.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Returns the profile for `mode`.
    pub fn profile(&self, mode: PwaMode) -> &PwaProfile {
        match mode {
            PwaMode::Production => &self.production,
            PwaMode::Development => &self.development,
        }
    }
}
