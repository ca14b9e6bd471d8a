//! Development-only `window.pwaDebug` global.
//!
//! Nothing here runs unless the composition root calls [`install_debug_global`], which it only
//! does in development mode.

use std::rc::Rc;

use pwa_host::DiagnosticsPort;

/// Name of the global object exposed on `window`.
pub const DEBUG_GLOBAL_NAME: &str = "pwaDebug";

/// Publishes `port` as `window.pwaDebug` with `forceShowUpdate`, `forceShowReminder`,
/// `forceShowInstallPrompt`, and `getAppStatus` functions.
///
/// # Errors
///
/// Returns an error when `window` is unavailable or a property cannot be set. On non-wasm
/// targets this is a no-op.
pub fn install_debug_global(port: Rc<dyn DiagnosticsPort>) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use js_sys::{Object, Reflect};
        use serde::Serialize;
        use wasm_bindgen::{closure::Closure, JsValue};

        fn set(target: &Object, name: &str, value: &JsValue) -> Result<(), String> {
            Reflect::set(target, &JsValue::from_str(name), value)
                .map(|_| ())
                .map_err(|e| format!("set `{name}` failed: {e:?}"))
        }

        fn action(
            target: &Object,
            name: &str,
            port: Rc<dyn DiagnosticsPort>,
            run: fn(&dyn DiagnosticsPort),
        ) -> Result<(), String> {
            let callback = Closure::<dyn Fn()>::new(move || run(port.as_ref()));
            set(target, name, callback.as_ref())?;
            callback.forget();
            Ok(())
        }

        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let debug = Object::new();

        action(&debug, "forceShowUpdate", port.clone(), |p| p.force_show_update())?;
        action(&debug, "forceShowReminder", port.clone(), |p| {
            p.force_show_reminder()
        })?;
        action(&debug, "forceShowInstallPrompt", port.clone(), |p| {
            p.force_show_install_prompt()
        })?;

        let status_port = port;
        let get_status = Closure::<dyn Fn() -> JsValue>::new(move || {
            status_port
                .app_status()
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .unwrap_or(JsValue::NULL)
        });
        set(&debug, "getAppStatus", get_status.as_ref())?;
        get_status.forget();

        set(&window, DEBUG_GLOBAL_NAME, &debug)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = port;
        Ok(())
    }
}
