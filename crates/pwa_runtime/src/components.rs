//! Leptos prompt components driven by the coordinator.

mod install_fab;
mod install_snackbar;
pub mod policy;
mod provider;
mod toast;
mod update_banner;

use leptos::*;

pub use install_fab::InstallFab;
pub use install_snackbar::{InstallSnackbarFlow, ReminderSnackbar};
pub use provider::{use_install_capability, use_pwa, PwaContext, PwaProvider, ToastMessage};
pub use toast::ToastHost;
pub use update_banner::UpdateBanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Presentation used for the install prompt.
pub enum InstallPromptVariant {
    /// Full-width snackbar with an auto-prompt.
    #[default]
    Snackbar,
    /// Floating action button.
    Fab,
}

#[component]
/// Update banner, install prompt, reminder, and toasts in one mount point.
pub fn PwaPrompts(
    #[prop(default = InstallPromptVariant::Snackbar)] variant: InstallPromptVariant,
) -> impl IntoView {
    view! {
        <UpdateBanner />
        {match variant {
            InstallPromptVariant::Snackbar => view! { <InstallSnackbarFlow /> }.into_view(),
            InstallPromptVariant::Fab => view! { <InstallFab /> }.into_view(),
        }}
        <ReminderSnackbar />
        <ToastHost />
    }
}
