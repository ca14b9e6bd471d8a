use leptos::ev::MouseEvent;
use leptos::*;
use system_ui::Snackbar;

use super::provider::use_pwa;

#[component]
/// Renders the current transient toast.
pub fn ToastHost() -> impl IntoView {
    let pwa = use_pwa();
    let dismiss = Callback::new(move |_: MouseEvent| pwa.toast.set(None));

    move || {
        pwa.toast.get().map(|toast| {
            view! {
                <Snackbar message=toast.text tone=toast.tone on_dismiss=dismiss ui_slot="pwa-toast" />
            }
        })
    }
}
