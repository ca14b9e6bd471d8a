//! Key/value persistence contracts for PWA bookkeeping (cooldowns, flags, counters).
//!
//! Values are stored as plain strings, matching what `localStorage` holds. The contract is
//! synchronous because the browser API is; callers treat every error as "no value".

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Host service for small string values keyed by name.
pub trait PwaStore {
    /// Loads the raw value stored under `key`.
    fn load_value(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores `value` under `key`.
    fn save_value(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`.
    fn delete_value(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store used when persistent storage is unavailable (server rendering, privacy modes).
pub struct NoopPwaStore;

impl PwaStore for NoopPwaStore {
    fn load_value(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_value(&self, _key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete_value(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryStoreState {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string; clones share contents.
pub struct MemoryPwaStore {
    inner: Rc<RefCell<MemoryStoreState>>,
}

impl MemoryPwaStore {
    /// Returns a copy of the raw value under `key`, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Makes subsequent reads fail, as a throwing `localStorage` getter would.
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    /// Makes subsequent writes and deletes fail (quota exceeded, storage disabled).
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    /// Returns whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PwaStore for MemoryPwaStore {
    fn load_value(&self, key: &str) -> Result<Option<String>, String> {
        let state = self.inner.borrow();
        if state.fail_reads {
            return Err(format!("read of `{key}` rejected"));
        }
        Ok(state.values.get(key).cloned())
    }

    fn save_value(&self, key: &str, value: &str) -> Result<(), String> {
        let mut state = self.inner.borrow_mut();
        if state.fail_writes {
            return Err(format!("write of `{key}` rejected"));
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_value(&self, key: &str) -> Result<(), String> {
        let mut state = self.inner.borrow_mut();
        if state.fail_writes {
            return Err(format!("delete of `{key}` rejected"));
        }
        state.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip_and_delete() {
        let store = MemoryPwaStore::default();
        let store_obj: &dyn PwaStore = &store;

        store_obj.save_value("pwa-visit-count", "2").expect("save");
        assert_eq!(
            store_obj.load_value("pwa-visit-count").expect("load"),
            Some("2".to_string())
        );
        store_obj.delete_value("pwa-visit-count").expect("delete");
        assert_eq!(store_obj.load_value("pwa-visit-count").expect("load"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_failure_injection() {
        let store = MemoryPwaStore::default();
        store.save_value("k", "v").expect("save");

        store.set_fail_reads(true);
        assert!(store.load_value("k").is_err());
        assert_eq!(store.peek("k"), Some("v".to_string()));

        store.set_fail_writes(true);
        assert!(store.save_value("k", "w").is_err());
        assert!(store.delete_value("k").is_err());
        assert_eq!(store.peek("k"), Some("v".to_string()));
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopPwaStore;
        assert_eq!(store.load_value("k").expect("load"), None);
        store.save_value("k", "v").expect("save");
        assert_eq!(store.load_value("k").expect("load"), None);
        store.delete_value("k").expect("delete");
    }
}
