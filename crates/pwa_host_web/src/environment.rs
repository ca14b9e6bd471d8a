//! Environment source backed by `window`, `navigator`, and `document`.

use pwa_host::{EnvironmentSource, PageLocation};

#[derive(Debug, Clone, Copy, Default)]
/// Browser environment source. Every call reads the live DOM; nothing is cached.
pub struct WebEnvironmentSource;

#[cfg(target_arch = "wasm32")]
fn navigator_flag(name: &str) -> Option<wasm_bindgen::JsValue> {
    let navigator = web_sys::window()?.navigator();
    js_sys::Reflect::get(&navigator, &wasm_bindgen::JsValue::from_str(name)).ok()
}

impl EnvironmentSource for WebEnvironmentSource {
    fn is_browser(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window().and_then(|w| w.document()).is_some()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn user_agent(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.navigator().user_agent().ok())
                .unwrap_or_default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            String::new()
        }
    }

    fn viewport_width(&self) -> Option<f64> {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()?.inner_width().ok()?.as_f64()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            None
        }
    }

    fn has_touch_support(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return false;
            };
            let ontouchstart =
                js_sys::Reflect::has(&window, &wasm_bindgen::JsValue::from_str("ontouchstart"))
                    .unwrap_or(false);
            ontouchstart || window.navigator().max_touch_points() > 0
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn secure_context_flag(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window().is_some_and(|w| w.is_secure_context())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn location(&self) -> Option<PageLocation> {
        #[cfg(target_arch = "wasm32")]
        {
            let location = web_sys::window()?.location();
            Some(PageLocation {
                hostname: location.hostname().unwrap_or_default(),
                protocol: location.protocol().unwrap_or_default(),
                port: location.port().unwrap_or_default(),
                search: location.search().unwrap_or_default(),
                href: location.href().unwrap_or_default(),
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            None
        }
    }

    fn display_mode_standalone(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.match_media("(display-mode: standalone)").ok().flatten())
                .is_some_and(|query| query.matches())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn navigator_standalone(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            navigator_flag("standalone")
                .and_then(|value| value.as_bool())
                .unwrap_or(false)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn has_service_worker_api(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            navigator_flag("serviceWorker").is_some_and(|value| !value.is_undefined())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn has_manifest_link(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.query_selector("link[rel='manifest']").ok().flatten())
                .and_then(|link| link.get_attribute("href"))
                .is_some_and(|href| !href.trim().is_empty())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn is_document_hidden(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.document())
                .map_or(true, |d| d.hidden())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_source_matches_noop_source() {
        let source = WebEnvironmentSource;
        let noop = pwa_host::NoopEnvironmentSource;
        assert_eq!(source.is_browser(), noop.is_browser());
        assert_eq!(source.user_agent(), noop.user_agent());
        assert_eq!(source.location(), noop.location());
        assert_eq!(source.is_document_hidden(), noop.is_document_hidden());
    }
}
