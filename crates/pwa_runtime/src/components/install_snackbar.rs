use leptos::ev::MouseEvent;
use leptos::*;
use system_ui::Snackbar;

use super::{
    policy::{should_auto_prompt, should_show_on_request, INSTALL_PITCH, REMINDER_PITCH},
    provider::{use_install_capability, use_pwa},
};

#[component]
/// Snackbar variant of the install prompt.
///
/// On mobile the prompt opens on its own after the auto-prompt delay unless the dismissal
/// cooldown is running. [`super::PwaContext::show_install_prompt`] opens it immediately.
pub fn InstallSnackbarFlow() -> impl IntoView {
    let pwa = use_pwa();
    let can_install = use_install_capability(pwa);
    let visible = create_rw_signal(false);
    let installing = create_rw_signal(false);

    let (is_mobile, delay) = pwa.coordinator.with_value(|coordinator| {
        (
            coordinator.is_mobile_device(),
            coordinator.profile().auto_prompt_delay(),
        )
    });
    if is_mobile {
        if let Ok(timer) = set_timeout_with_handle(
            move || {
                let cooldown_elapsed = pwa
                    .coordinator
                    .with_value(|coordinator| coordinator.install_prompt_cooldown_elapsed());
                if should_auto_prompt(
                    true,
                    can_install.get_untracked(),
                    cooldown_elapsed,
                    visible.get_untracked(),
                ) {
                    visible.set(true);
                }
            },
            delay,
        ) {
            on_cleanup(move || timer.clear());
        }
    }

    create_effect(move |previous: Option<u64>| {
        let requests = pwa.install_requests.get();
        if previous.is_some() && should_show_on_request(can_install.get_untracked()) {
            visible.set(true);
        }
        requests
    });

    create_effect(move |_| {
        if !can_install.get() {
            visible.set(false);
        }
    });

    let install = Callback::new(move |_: MouseEvent| {
        visible.set(false);
        pwa.request_install(installing);
    });
    let dismiss = Callback::new(move |_: MouseEvent| {
        visible.set(false);
        pwa.coordinator
            .with_value(|coordinator| coordinator.dismiss_install_prompt());
    });

    view! {
        <Show when=move || visible.get() && can_install.get()>
            <Snackbar
                message=INSTALL_PITCH
                action_label="Install"
                on_action=install
                on_dismiss=dismiss
                ui_slot="pwa-install"
            />
        </Show>
    }
}

#[component]
/// Install reminder shown when the coordinator raises `show_app_reminder`.
///
/// Either action restarts the reminder cooldown.
pub fn ReminderSnackbar() -> impl IntoView {
    let pwa = use_pwa();
    let installing = create_rw_signal(false);

    let install = Callback::new(move |_: MouseEvent| {
        pwa.coordinator
            .with_value(|coordinator| coordinator.dismiss_app_reminder());
        pwa.request_install(installing);
    });
    let dismiss = Callback::new(move |_: MouseEvent| {
        pwa.coordinator
            .with_value(|coordinator| coordinator.dismiss_app_reminder());
    });

    view! {
        <Show when=move || pwa.show_app_reminder.get() && !pwa.is_app_installed.get()>
            <Snackbar
                message=REMINDER_PITCH
                action_label="Install"
                on_action=install
                on_dismiss=dismiss
                ui_slot="pwa-reminder"
            />
        </Show>
    }
}
