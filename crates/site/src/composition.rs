//! Composition root: the one place concrete host adapters meet the coordinator.

use std::rc::Rc;

use leptos::logging::warn;
use pwa_host_web::{build_pwa_host_services, host_strategy_name, install_debug_global};
use pwa_runtime::{PwaConfig, PwaCoordinator};

/// Builds the app-wide coordinator without starting it.
///
/// The caller starts it once the app is mounted. In development the coordinator is also
/// published as `window.pwaDebug`.
pub fn compose_pwa_coordinator() -> PwaCoordinator {
    let coordinator = PwaCoordinator::new(build_pwa_host_services(), &PwaConfig::embedded());

    if coordinator.mode().is_development() {
        leptos::logging::log!(
            "pwa: {} host, {} mode",
            host_strategy_name(),
            coordinator.mode().as_str()
        );
        if let Err(err) = install_debug_global(Rc::new(coordinator.clone())) {
            warn!("pwa debug global unavailable: {err}");
        }
    }

    coordinator
}

#[cfg(test)]
mod tests {
    use leptos::SignalGet;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_composition_is_inert() {
        let coordinator = compose_pwa_coordinator();
        coordinator.start();
        assert!(coordinator.is_inert());
        assert!(!coordinator.can_install_app());
        assert!(!coordinator.update_available().get());
        assert!(coordinator.clear_pwa_data().is_ok());
    }
}
