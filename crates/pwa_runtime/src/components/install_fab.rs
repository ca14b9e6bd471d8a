use leptos::ev::MouseEvent;
use leptos::*;
use system_ui::FloatingActionButton;

use super::{
    policy::should_show_fab,
    provider::{use_install_capability, use_pwa},
};

#[component]
/// Floating-action-button variant of the install prompt.
///
/// The button appears on mobile after the reveal delay, unless the dismissal cooldown is
/// running, and immediately on [`super::PwaContext::show_install_prompt`].
pub fn InstallFab() -> impl IntoView {
    let pwa = use_pwa();
    let can_install = use_install_capability(pwa);
    let revealed = create_rw_signal(false);
    let installing = create_rw_signal(false);

    let (is_mobile, delay) = pwa.coordinator.with_value(|coordinator| {
        (
            coordinator.is_mobile_device(),
            coordinator.profile().fab_reveal_delay(),
        )
    });
    if is_mobile {
        if let Ok(timer) = set_timeout_with_handle(
            move || {
                if pwa
                    .coordinator
                    .with_value(|coordinator| coordinator.install_prompt_cooldown_elapsed())
                {
                    revealed.set(true);
                }
            },
            delay,
        ) {
            on_cleanup(move || timer.clear());
        }
    }

    create_effect(move |previous: Option<u64>| {
        let requests = pwa.install_requests.get();
        if previous.is_some() {
            revealed.set(true);
        }
        requests
    });

    let install = Callback::new(move |_: MouseEvent| pwa.request_install(installing));

    view! {
        <Show when=move || should_show_fab(can_install.get(), revealed.get(), installing.get())>
            <FloatingActionButton
                aria_label="Install app"
                glyph="\u{2913}"
                busy=installing
                on_click=install
                ui_slot="pwa-install-fab"
            >
                "Install"
            </FloatingActionButton>
        </Show>
    }
}
