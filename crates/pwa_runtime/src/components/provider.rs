use std::time::Duration;

use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::*;
use system_ui::FeedbackTone;

use super::policy::{
    install_result_toast, install_route, restarts_prompt_cooldown, InstallRoute,
    IOS_INSTALL_INSTRUCTIONS,
};
use crate::coordinator::PwaCoordinator;

/// DOM event announcing a freshly captured install prompt.
const INSTALL_AVAILABLE_EVENT: &str = "pwa-install-available";

#[derive(Debug, Clone, PartialEq)]
/// Transient message rendered by [`super::ToastHost`].
pub struct ToastMessage {
    /// Monotonic id; a newer toast replaces an older one.
    pub id: u64,
    /// Message text.
    pub text: String,
    /// Visual tone.
    pub tone: FeedbackTone,
}

#[derive(Clone, Copy)]
/// Leptos context handing [`PwaCoordinator`] state to the prompt components.
pub struct PwaContext {
    /// Shared coordinator.
    pub coordinator: StoredValue<PwaCoordinator>,
    /// [`PwaCoordinator::update_available`].
    pub update_available: ReadSignal<bool>,
    /// [`PwaCoordinator::is_app_installed`].
    pub is_app_installed: ReadSignal<bool>,
    /// [`PwaCoordinator::show_app_reminder`].
    pub show_app_reminder: ReadSignal<bool>,
    /// Bumped on every `pwa-install-available` event.
    pub install_available: RwSignal<u64>,
    /// Bumped by [`PwaContext::show_install_prompt`].
    pub install_requests: RwSignal<u64>,
    /// Toast currently on screen.
    pub toast: RwSignal<Option<ToastMessage>>,
    toast_timer: StoredValue<Option<TimeoutHandle>>,
}

impl PwaContext {
    /// Returns a handle to the shared coordinator.
    pub fn coordinator(&self) -> PwaCoordinator {
        self.coordinator.get_value()
    }

    /// Opens the install prompt now, bypassing the dismissal cooldown.
    pub fn show_install_prompt(&self) {
        self.install_requests.update(|requests| *requests += 1);
    }

    /// Shows `text` for the configured toast duration, replacing any current toast.
    pub fn toast(&self, text: impl Into<String>, tone: FeedbackTone) {
        let id = self
            .toast
            .get_untracked()
            .map_or(1, |current| current.id + 1);
        self.toast.set(Some(ToastMessage {
            id,
            text: text.into(),
            tone,
        }));

        let toast = self.toast;
        let duration = self
            .coordinator
            .with_value(|coordinator| coordinator.profile().toast_duration());
        let timer = set_timeout_with_handle(
            move || {
                toast.try_update(|current| expire_toast(current, id));
            },
            duration,
        )
        .ok();
        self.toast_timer.update_value(|pending| {
            if let Some(previous) = std::mem::replace(pending, timer) {
                previous.clear();
            }
        });
    }

    /// Runs the platform's install path and reports the outcome as a toast.
    ///
    /// On iOS Safari this only explains the share-sheet flow. `installing` stays true while
    /// the native dialog is open; overlapping requests are ignored.
    pub fn request_install(&self, installing: RwSignal<bool>) {
        let coordinator = self.coordinator();
        if install_route(coordinator.platform_kind()) == InstallRoute::ShareSheetInstructions {
            self.toast(IOS_INSTALL_INSTRUCTIONS, FeedbackTone::Info);
            return;
        }
        if installing.get_untracked() {
            return;
        }
        installing.set(true);

        let pwa = *self;
        spawn_local(async move {
            let result = coordinator.install_app().await;
            installing.try_set(false);
            if restarts_prompt_cooldown(&result) {
                coordinator.dismiss_install_prompt();
            }
            if let Err(rejection) = &result {
                logging::log!("install request ended: {}", rejection.code());
            }
            if let Some((text, tone)) = install_result_toast(&result) {
                pwa.toast(text, tone);
            }
        });
    }
}

#[component]
/// Provides [`PwaContext`] to descendant components.
///
/// The `pwa-install-available` listener and any pending toast timer are released when the
/// provider is torn down; the coordinator itself lives on.
pub fn PwaProvider(
    /// Started coordinator built by the composition root.
    coordinator: PwaCoordinator,
    children: Children,
) -> impl IntoView {
    let install_available = create_rw_signal(0_u64);

    let toast_timer = store_value(None::<TimeoutHandle>);
    on_cleanup(move || {
        toast_timer.try_update_value(|pending| {
            if let Some(timer) = pending.take() {
                timer.clear();
            }
        });
    });

    let install_listener = window_event_listener_untyped(INSTALL_AVAILABLE_EVENT, move |_| {
        install_available.update(|count| *count += 1);
    });
    on_cleanup(move || install_listener.remove());

    provide_context(PwaContext {
        update_available: coordinator.update_available(),
        is_app_installed: coordinator.is_app_installed(),
        show_app_reminder: coordinator.show_app_reminder(),
        coordinator: store_value(coordinator),
        install_available,
        install_requests: create_rw_signal(0),
        toast: create_rw_signal(None),
        toast_timer,
    });

    children()
}

/// Drops the toast in `slot` if it is still the one with `id`.
fn expire_toast(slot: &mut Option<ToastMessage>, id: u64) {
    if slot.as_ref().is_some_and(|shown| shown.id == id) {
        *slot = None;
    }
}

/// Returns the [`PwaContext`] provided by [`PwaProvider`].
pub fn use_pwa() -> PwaContext {
    use_context::<PwaContext>().expect("PwaContext not provided")
}

/// Tracks `can_install_app()`.
///
/// Re-checked on a timer because some browsers deliver the install signal only after the page
/// first asked, and immediately on `pwa-install-available` or an install-state change.
pub fn use_install_capability(pwa: PwaContext) -> Signal<bool> {
    let coordinator = pwa.coordinator;
    let can_install =
        create_rw_signal(coordinator.with_value(|coordinator| coordinator.can_install_app()));
    let recheck = move || {
        can_install.set(coordinator.with_value(|coordinator| coordinator.can_install_app()));
    };

    let every: Duration = coordinator
        .with_value(|coordinator| coordinator.profile().install_recheck_interval());
    if let Ok(interval) = set_interval_with_handle(recheck, every) {
        on_cleanup(move || interval.clear());
    }

    create_effect(move |_| {
        pwa.install_available.track();
        pwa.is_app_installed.track();
        recheck();
    });

    can_install.into()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn toast(id: u64) -> Option<ToastMessage> {
        Some(ToastMessage {
            id,
            text: format!("toast {id}"),
            tone: FeedbackTone::Info,
        })
    }

    #[test]
    fn expiry_only_removes_the_toast_it_was_armed_for() {
        let mut slot = toast(2);
        expire_toast(&mut slot, 1);
        assert_eq!(slot, toast(2));

        expire_toast(&mut slot, 2);
        assert_eq!(slot, None);

        expire_toast(&mut slot, 2);
        assert_eq!(slot, None);
    }
}
