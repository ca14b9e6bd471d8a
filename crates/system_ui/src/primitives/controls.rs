use super::*;

#[component]
/// Shared button primitive with standardized variant, size, and disabled states.
pub fn Button(
    #[prop(default = ButtonVariant::Standard)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Md)] size: ButtonSize,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=merge_layout_class("ui-button", layout_class)
            id=id
            aria-label=move || aria_label.get()
            title=move || title.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="button"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=forward_click(on_click)
        >
            {children()}
        </button>
    }
}

#[component]
/// Floating action button pinned to the viewport corner.
///
/// `glyph` renders before the label; the label collapses on narrow screens via CSS, so
/// `aria_label` should always be set.
pub fn FloatingActionButton(
    #[prop(into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] glyph: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] busy: MaybeSignal<bool>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=merge_layout_class("ui-fab", layout_class)
            aria-label=move || aria_label.get()
            aria-busy=move || bool_token(busy.get())
            disabled=move || busy.get()
            data-ui-primitive="true"
            data-ui-kind="fab"
            data-ui-slot=ui_slot
            data-ui-state=move || if busy.get() { "busy" } else { "idle" }
            on:click=forward_click(on_click)
        >
            {glyph.map(|glyph| view! { <span class="ui-fab-glyph" aria-hidden="true">{glyph}</span> })}
            <span class="ui-fab-label">{children()}</span>
        </button>
    }
}
