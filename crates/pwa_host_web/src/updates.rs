//! Service-worker update adapter.
//!
//! Version lifecycle is derived from the active registration: `updatefound` reports a detected
//! version, the new worker reaching `installed` while a controller exists reports a ready
//! version, and a worker going `redundant` mid-install reports a failed installation.
//! Activation posts `{type: "SKIP_WAITING"}` to the waiting worker and resolves once the page's
//! controller changes. The worker script must answer that message with `self.skipWaiting()`;
//! the site ships one in `public/sw.js`.

use std::rc::Rc;

use pwa_host::{UpdateFuture, UpdateSource, VersionEvent};

#[derive(Debug, Clone, Copy, Default)]
/// Browser update source backed by `navigator.serviceWorker`.
pub struct WebUpdateSource;

#[cfg(target_arch = "wasm32")]
mod imp {
    use std::rc::Rc;

    use pwa_host::VersionEvent;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{ServiceWorker, ServiceWorkerContainer, ServiceWorkerRegistration, ServiceWorkerState};

    pub(super) const SKIP_WAITING_MESSAGE: &str = "SKIP_WAITING";
    const ACTIVATION_TIMEOUT_MS: i32 = 10_000;

    pub(super) fn container() -> Option<ServiceWorkerContainer> {
        let navigator = web_sys::window()?.navigator();
        let present = js_sys::Reflect::get(&navigator, &JsValue::from_str("serviceWorker"))
            .is_ok_and(|value| !value.is_undefined());
        present.then(|| navigator.service_worker())
    }

    pub(super) async fn registration() -> Result<ServiceWorkerRegistration, String> {
        let container = container().ok_or_else(|| "service workers unsupported".to_string())?;
        let found = JsFuture::from(container.get_registration())
            .await
            .map_err(|e| format!("service worker registration lookup failed: {e:?}"))?;
        found
            .dyn_into::<ServiceWorkerRegistration>()
            .map_err(|_| "no service worker registration".to_string())
    }

    fn has_controller() -> bool {
        container().is_some_and(|c| c.controller().is_some())
    }

    fn watch_installing(worker: ServiceWorker, on_event: Rc<dyn Fn(VersionEvent)>) {
        let observed = worker.clone();
        let on_state = Closure::<dyn FnMut()>::new(move || match observed.state() {
            ServiceWorkerState::Installed if has_controller() => {
                on_event(VersionEvent::VersionReady)
            }
            ServiceWorkerState::Redundant => on_event(VersionEvent::VersionInstallationFailed {
                error: "installing service worker became redundant".to_string(),
            }),
            _ => {}
        });
        worker.set_onstatechange(Some(on_state.as_ref().unchecked_ref()));
        on_state.forget();
    }

    /// Asks `waiting` to take over and waits for `controllerchange`.
    ///
    /// Fails after [`ACTIVATION_TIMEOUT_MS`] so a worker that ignores the message never leads to
    /// a reload onto the old version.
    pub(super) async fn skip_waiting(waiting: ServiceWorker) -> Result<(), String> {
        let container = container().ok_or_else(|| "service workers unsupported".to_string())?;
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;

        let activated = js_sys::Promise::new(&mut |resolve, reject| {
            let on_change = Closure::once_into_js(move || {
                let _ = resolve.call0(&JsValue::NULL);
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_once(true);
            let _ = container.add_event_listener_with_callback_and_add_event_listener_options(
                "controllerchange",
                on_change.unchecked_ref(),
                &options,
            );

            let on_timeout = Closure::once_into_js(move || {
                let _ = reject.call1(
                    &JsValue::NULL,
                    &JsValue::from_str("new service worker did not take control"),
                );
            });
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                on_timeout.unchecked_ref(),
                ACTIVATION_TIMEOUT_MS,
            );
        });

        let message = js_sys::Object::new();
        js_sys::Reflect::set(
            &message,
            &JsValue::from_str("type"),
            &JsValue::from_str(SKIP_WAITING_MESSAGE),
        )
        .map_err(|e| format!("SKIP_WAITING message could not be built: {e:?}"))?;
        waiting
            .post_message(&message)
            .map_err(|e| format!("SKIP_WAITING post failed: {e:?}"))?;

        JsFuture::from(activated)
            .await
            .map(|_| ())
            .map_err(|e| format!("service worker activation failed: {e:?}"))
    }

    pub(super) async fn watch(on_event: Rc<dyn Fn(VersionEvent)>) -> Result<(), String> {
        let registration = registration().await?;

        if registration.waiting().is_some() && has_controller() {
            on_event(VersionEvent::VersionReady);
        }

        let observed = registration.clone();
        let on_update_found = Closure::<dyn FnMut()>::new(move || {
            on_event(VersionEvent::VersionDetected);
            if let Some(worker) = observed.installing() {
                watch_installing(worker, on_event.clone());
            }
        });
        registration.set_onupdatefound(Some(on_update_found.as_ref().unchecked_ref()));
        on_update_found.forget();
        Ok(())
    }
}

impl UpdateSource for WebUpdateSource {
    fn is_enabled(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            imp::container().is_some()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn listen(&self, on_event: Rc<dyn Fn(VersionEvent)>) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = imp::watch(on_event.clone()).await {
                    on_event(VersionEvent::VersionInstallationFailed { error: err });
                }
            });
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = on_event;
            Ok(())
        }
    }

    fn check_for_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let registration = imp::registration().await?;
                let pending = registration
                    .update()
                    .map_err(|e| format!("service worker update() threw: {e:?}"))?;
                wasm_bindgen_futures::JsFuture::from(pending)
                    .await
                    .map_err(|e| format!("service worker update() rejected: {e:?}"))?;
                Ok(registration.installing().is_some() || registration.waiting().is_some())
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                Ok(false)
            }
        })
    }

    fn activate_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let registration = imp::registration().await?;
                let Some(waiting) = registration.waiting() else {
                    return Ok(false);
                };
                imp::skip_waiting(waiting).await?;
                Ok(true)
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                Ok(false)
            }
        })
    }

    fn reload_page(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_source_is_disabled_and_inert() {
        let source = WebUpdateSource;
        assert!(!source.is_enabled());
        assert_eq!(block_on(source.check_for_update()), Ok(false));
        assert_eq!(block_on(source.activate_update()), Ok(false));
        source.listen(Rc::new(|_event: VersionEvent| {})).expect("listen");
        source.reload_page();
    }
}
