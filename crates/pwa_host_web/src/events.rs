//! DOM `CustomEvent` dispatch for page-level PWA notifications.

use pwa_host::{PwaEvent, PwaEventSink};

#[derive(Debug, Clone, Copy, Default)]
/// Dispatches [`PwaEvent`] values as payload-free `CustomEvent`s on `window`.
pub struct WebPwaEventSink;

impl PwaEventSink for WebPwaEventSink {
    fn emit(&self, event: PwaEvent) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let name = event.dom_event_name();
            match web_sys::CustomEvent::new(name) {
                Ok(custom) => {
                    if let Err(err) = window.dispatch_event(&custom) {
                        web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&format!(
                            "dispatch of `{name}` failed: {err:?}"
                        )));
                    }
                }
                Err(err) => web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(
                    &format!("create `{name}` event failed: {err:?}"),
                )),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = event;
        }
    }
}
