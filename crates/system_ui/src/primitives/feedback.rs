use super::*;

#[component]
/// Transient bottom-anchored message with an optional action and close control.
pub fn Snackbar(
    #[prop(into)] message: MaybeSignal<String>,
    #[prop(default = FeedbackTone::Info)] tone: FeedbackTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] action_label: Option<String>,
    #[prop(optional)] on_action: Option<Callback<MouseEvent>>,
    #[prop(optional)] on_dismiss: Option<Callback<MouseEvent>>,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-snackbar", layout_class)
            role="status"
            aria-live=tone.aria_live()
            data-ui-primitive="true"
            data-ui-kind="snackbar"
            data-ui-slot=ui_slot
            data-ui-tone=tone.token()
        >
            <span class="ui-snackbar-message">{move || message.get()}</span>
            {action_label.map(|label| view! {
                <Button variant=ButtonVariant::Primary size=ButtonSize::Sm ui_slot="snackbar-action" on_click=Callback::new(forward_click(on_action))>
                    {label}
                </Button>
            })}
            {on_dismiss.map(|on_dismiss| view! {
                <Button variant=ButtonVariant::Quiet size=ButtonSize::Sm ui_slot="snackbar-dismiss" aria_label="Dismiss" on_click=on_dismiss>
                    "✕"
                </Button>
            })}
        </div>
    }
}

#[component]
/// Full-width banner anchored to the top of the page; actions go in `children`.
pub fn Banner(
    #[prop(into)] title: MaybeSignal<String>,
    #[prop(optional, into)] message: MaybeSignal<String>,
    #[prop(default = FeedbackTone::Info)] tone: FeedbackTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let label = title.clone();
    view! {
        <section
            class=merge_layout_class("ui-banner", layout_class)
            role="region"
            aria-label=move || label.get()
            aria-live=tone.aria_live()
            data-ui-primitive="true"
            data-ui-kind="banner"
            data-ui-slot=ui_slot
            data-ui-tone=tone.token()
        >
            <div class="ui-banner-text">
                <strong class="ui-banner-title">{move || title.get()}</strong>
                <span class="ui-banner-message">{move || message.get()}</span>
            </div>
            <div class="ui-banner-actions">{children()}</div>
        </section>
    }
}
