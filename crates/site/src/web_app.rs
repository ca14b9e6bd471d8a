use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use pwa_runtime::components::{use_install_capability, use_pwa};
use pwa_runtime::{InstallPromptVariant, PwaCoordinator, PwaPrompts, PwaProvider};
use system_ui::{Button, ButtonVariant};

#[component]
pub fn SiteApp(coordinator: PwaCoordinator) -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Eats" />
        <Meta name="description" content="Find restaurants near you." />
        <Meta name="theme-color" content="#d9480f" />

        <PwaProvider coordinator>
            <Router>
                <main class="site-root">
                    <Routes>
                        <Route path="" view=HomeRoute />
                        <Route path="/restaurants/:slug" view=RestaurantRoute />
                    </Routes>
                </main>
            </Router>
            <PwaPrompts variant=InstallPromptVariant::Snackbar />
        </PwaProvider>
    }
}

#[component]
pub fn HomeRoute() -> impl IntoView {
    let pwa = use_pwa();
    let can_install = use_install_capability(pwa);

    view! {
        <section class="home">
            <h1>"Eats"</h1>
            <p>"Discover restaurants, save favourites, and book a table."</p>
            <Show when=move || can_install.get()>
                <Button
                    variant=ButtonVariant::Quiet
                    ui_slot="home-install"
                    on_click=Callback::new(move |_| pwa.show_install_prompt())
                >
                    "Install the app"
                </Button>
            </Show>
        </section>
    }
}

#[component]
fn RestaurantRoute() -> impl IntoView {
    let params = use_params_map();
    let slug = move || {
        params
            .with(|map| map.get("slug").cloned())
            .unwrap_or_else(|| "unknown".to_string())
    };

    view! {
        <section class="restaurant">
            <h1>{move || slug()}</h1>
            <p>"Restaurant details load here."</p>
            <A href="/">"Back to restaurants"</A>
        </section>
    }
}
