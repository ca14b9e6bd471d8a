use leptos::ev::MouseEvent;
use leptos::*;
use system_ui::{Banner, Button, ButtonVariant, FeedbackTone};

use super::{
    policy::{UPDATE_MESSAGE, UPDATE_TITLE},
    provider::use_pwa,
};

#[component]
/// Banner offering to reload into a waiting app version.
pub fn UpdateBanner() -> impl IntoView {
    let pwa = use_pwa();
    let postponed = create_rw_signal(false);
    let applying = create_rw_signal(false);

    let reload = Callback::new(move |_: MouseEvent| {
        if applying.get_untracked() {
            return;
        }
        applying.set(true);
        let coordinator = pwa.coordinator();
        spawn_local(async move {
            coordinator.update_app().await;
            applying.try_set(false);
            // A successful activation reloads the page before this runs.
            if coordinator.update_available().get_untracked() {
                pwa.toast(
                    "The update could not be applied. Please try again.",
                    FeedbackTone::Warning,
                );
            }
        });
    });
    let later = Callback::new(move |_: MouseEvent| postponed.set(true));

    view! {
        <Show when=move || pwa.update_available.get() && !postponed.get()>
            <Banner title=UPDATE_TITLE message=UPDATE_MESSAGE ui_slot="pwa-update">
                <Button variant=ButtonVariant::Primary disabled=applying on_click=reload>
                    "Reload"
                </Button>
                <Button variant=ButtonVariant::Quiet on_click=later>
                    "Later"
                </Button>
            </Banner>
        </Show>
    }
}
