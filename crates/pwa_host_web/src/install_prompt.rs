//! `beforeinstallprompt` / `appinstalled` capture.

use pwa_host::{InstallPromptListeners, InstallPromptSource};

#[cfg(target_arch = "wasm32")]
pub use wasm_handle::WebInstallPromptHandle;

#[derive(Debug, Clone, Copy, Default)]
/// Registers window listeners for the native install signals.
///
/// The deferred `beforeinstallprompt` event has its default UI suppressed before it is handed to
/// the coordinator as a [`pwa_host::InstallPromptHandle`].
pub struct WebInstallPromptSource;

impl InstallPromptSource for WebInstallPromptSource {
    fn listen(&self, listeners: InstallPromptListeners) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            use std::rc::Rc;

            use wasm_bindgen::{closure::Closure, JsCast};

            let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;

            let on_available = listeners.on_available.clone();
            let before_install = Closure::<dyn FnMut(web_sys::Event)>::new(
                move |event: web_sys::Event| {
                    event.prevent_default();
                    on_available(Rc::new(WebInstallPromptHandle::new(event)));
                },
            );
            window
                .add_event_listener_with_callback(
                    "beforeinstallprompt",
                    before_install.as_ref().unchecked_ref(),
                )
                .map_err(|e| format!("beforeinstallprompt listener failed: {e:?}"))?;
            // Page-lifetime listener.
            before_install.forget();

            let on_installed = listeners.on_installed.clone();
            let app_installed =
                Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                    on_installed();
                });
            window
                .add_event_listener_with_callback(
                    "appinstalled",
                    app_installed.as_ref().unchecked_ref(),
                )
                .map_err(|e| format!("appinstalled listener failed: {e:?}"))?;
            app_installed.forget();
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = listeners;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_handle {
    use js_sys::{Function, Promise, Reflect};
    use pwa_host::{InstallChoice, InstallPromptFuture, InstallPromptHandle};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    #[derive(Debug, Clone)]
    /// Deferred `BeforeInstallPromptEvent` (not modelled by `web-sys`, reached via reflection).
    pub struct WebInstallPromptHandle {
        event: web_sys::Event,
    }

    impl WebInstallPromptHandle {
        pub(crate) fn new(event: web_sys::Event) -> Self {
            Self { event }
        }

        fn property(&self, name: &str) -> Result<JsValue, String> {
            Reflect::get(&self.event, &JsValue::from_str(name))
                .map_err(|e| format!("install prompt `{name}` unreadable: {e:?}"))
        }

        async fn show(&self) -> Result<InstallChoice, String> {
            let prompt: Function = self
                .property("prompt")?
                .dyn_into()
                .map_err(|_| "install prompt has no prompt()".to_string())?;
            let shown = prompt
                .call0(&self.event)
                .map_err(|e| format!("install prompt() threw: {e:?}"))?;
            if let Ok(shown) = shown.dyn_into::<Promise>() {
                JsFuture::from(shown)
                    .await
                    .map_err(|e| format!("install prompt() rejected: {e:?}"))?;
            }

            let user_choice: Promise = self
                .property("userChoice")?
                .dyn_into()
                .map_err(|_| "install prompt has no userChoice".to_string())?;
            let choice = JsFuture::from(user_choice)
                .await
                .map_err(|e| format!("install userChoice rejected: {e:?}"))?;
            let outcome = Reflect::get(&choice, &JsValue::from_str("outcome"))
                .ok()
                .and_then(|value| value.as_string());

            Ok(match outcome.as_deref() {
                Some("accepted") => InstallChoice::Accepted,
                _ => InstallChoice::Dismissed,
            })
        }
    }

    impl InstallPromptHandle for WebInstallPromptHandle {
        fn prompt(&self) -> InstallPromptFuture<'_, Result<InstallChoice, String>> {
            Box::pin(self.show())
        }
    }
}
