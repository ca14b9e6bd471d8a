mod composition;
mod web_app;

pub use composition::compose_pwa_coordinator;
pub use web_app::{HomeRoute, SiteApp};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    let coordinator = compose_pwa_coordinator();
    let app_coordinator = coordinator.clone();
    leptos::mount_to_body(move || leptos::view! { <SiteApp coordinator=app_coordinator /> });
    coordinator.start();
}
