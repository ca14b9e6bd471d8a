//! `localStorage`-backed key/value store implementation.
//!
//! Values are written as plain strings (not JSON) so they stay readable from devtools and match
//! what other scripts on the page expect under the `pwa-*` keys.

use pwa_host::PwaStore;

#[derive(Debug, Clone, Copy, Default)]
/// Browser key/value store backed by `window.localStorage`.
pub struct WebPwaStore;

impl WebPwaStore {
    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or_else(|| "window unavailable".to_string())?
            .local_storage()
            .map_err(|e| format!("localStorage access denied: {e:?}"))?
            .ok_or_else(|| "localStorage unavailable".to_string())
    }
}

impl PwaStore for WebPwaStore {
    fn load_value(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn save_value(&self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn delete_value(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_store_reads_nothing_and_accepts_writes() {
        let store = WebPwaStore;
        store.save_value("pwa-visit-count", "3").expect("save");
        assert_eq!(store.load_value("pwa-visit-count").expect("load"), None);
        store.delete_value("pwa-visit-count").expect("delete");
    }
}
