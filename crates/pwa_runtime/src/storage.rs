//! Persisted install flags, cooldown anchors, and the visit counter.
//!
//! Values are plain strings so they stay readable in the browser's storage inspector. Read
//! failures and unparsable values degrade to "nothing persisted".

use std::rc::Rc;

use leptos::logging::warn;
use pwa_host::PwaStore;

use crate::error::PwaError;

/// `"true"` once a development-mode install was simulated.
pub const DEV_INSTALLED_KEY: &str = "pwa-dev-installed";
/// Epoch-ms of the last dismissed install prompt.
pub const PROMPT_DISMISSED_KEY: &str = "pwa-prompt-dismissed";
/// Epoch-ms of the last dismissed install reminder.
pub const REMINDER_SHOWN_KEY: &str = "pwa-reminder-shown";
/// Decimal count of qualifying mobile visits.
pub const VISIT_COUNT_KEY: &str = "pwa-visit-count";

/// Every key owned by the coordinator.
pub const PWA_STORAGE_KEYS: [&str; 4] = [
    DEV_INSTALLED_KEY,
    PROMPT_DISMISSED_KEY,
    REMINDER_SHOWN_KEY,
    VISIT_COUNT_KEY,
];

/// Typed view over the coordinator's storage keys.
#[derive(Clone)]
pub struct PwaStorage {
    store: Rc<dyn PwaStore>,
}

impl PwaStorage {
    pub fn new(store: Rc<dyn PwaStore>) -> Self {
        Self { store }
    }

    fn read(&self, key: &'static str) -> Option<String> {
        match self.store.load_value(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("pwa storage read of `{key}` failed: {err}");
                None
            }
        }
    }

    fn read_number<T: std::str::FromStr>(&self, key: &'static str) -> Option<T> {
        let raw = self.read(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring unparsable pwa storage value for `{key}`: {raw:?}");
                None
            }
        }
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), PwaError> {
        self.store
            .save_value(key, value)
            .map_err(|message| PwaError::Storage { key, message })
    }

    fn delete(&self, key: &'static str) -> Result<(), PwaError> {
        self.store
            .delete_value(key)
            .map_err(|message| PwaError::Storage { key, message })
    }

    pub fn dev_installed(&self) -> bool {
        self.read(DEV_INSTALLED_KEY).as_deref() == Some("true")
    }

    pub fn set_dev_installed(&self) -> Result<(), PwaError> {
        self.write(DEV_INSTALLED_KEY, "true")
    }

    pub fn clear_dev_installed(&self) -> Result<(), PwaError> {
        self.delete(DEV_INSTALLED_KEY)
    }

    pub fn reminder_shown_at(&self) -> Option<u64> {
        self.read_number(REMINDER_SHOWN_KEY)
    }

    pub fn set_reminder_shown_at(&self, now_ms: u64) -> Result<(), PwaError> {
        self.write(REMINDER_SHOWN_KEY, &now_ms.to_string())
    }

    pub fn prompt_dismissed_at(&self) -> Option<u64> {
        self.read_number(PROMPT_DISMISSED_KEY)
    }

    pub fn set_prompt_dismissed_at(&self, now_ms: u64) -> Result<(), PwaError> {
        self.write(PROMPT_DISMISSED_KEY, &now_ms.to_string())
    }

    /// Returns the persisted visit count, zero when absent.
    pub fn visit_count(&self) -> u32 {
        self.read_number(VISIT_COUNT_KEY).unwrap_or(0)
    }

    /// Persists `visit_count() + 1` and returns the new count.
    pub fn increment_visit_count(&self) -> Result<u32, PwaError> {
        let next = self.visit_count().saturating_add(1);
        self.write(VISIT_COUNT_KEY, &next.to_string())?;
        Ok(next)
    }

    /// Deletes every coordinator key, reporting the first failure after attempting all.
    pub fn clear_all(&self) -> Result<(), PwaError> {
        let mut first_err = None;
        for key in PWA_STORAGE_KEYS {
            if let Err(err) = self.delete(key) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Returns whether a cooldown anchored at `anchor_ms` has run out at `now_ms`.
///
/// A missing anchor never blocks. An anchor in the future (clock skew) counts as zero elapsed.
pub fn cooldown_elapsed(anchor_ms: Option<u64>, now_ms: u64, cooldown_ms: u64) -> bool {
    match anchor_ms {
        None => true,
        Some(anchor) => now_ms.saturating_sub(anchor) >= cooldown_ms,
    }
}
