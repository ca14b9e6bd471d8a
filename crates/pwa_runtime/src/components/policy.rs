//! Pure decisions shared by the prompt components.

use system_ui::FeedbackTone;

use crate::{error::InstallRejection, platform::PlatformKind};

/// Shown instead of a native prompt on iOS Safari, which has no install API.
pub const IOS_INSTALL_INSTRUCTIONS: &str =
    "To install, tap the Share button and then \u{201c}Add to Home Screen\u{201d}.";

pub const INSTALL_PITCH: &str = "Install the app for faster access to your favourite restaurants.";
pub const REMINDER_PITCH: &str = "Enjoying it? Add the app to your home screen.";
pub const UPDATE_TITLE: &str = "A new version is available";
pub const UPDATE_MESSAGE: &str = "Reload to get the latest features and fixes.";

/// How an install request is carried out on the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallRoute {
    /// Ask the coordinator to show the native prompt.
    NativePrompt,
    /// Explain the share-sheet flow.
    ShareSheetInstructions,
}

pub fn install_route(platform: PlatformKind) -> InstallRoute {
    match platform {
        PlatformKind::IosSafari => InstallRoute::ShareSheetInstructions,
        PlatformKind::Server | PlatformKind::WebView | PlatformKind::StandardBrowser => {
            InstallRoute::NativePrompt
        }
    }
}

/// Whether the delayed snackbar may open on its own.
pub fn should_auto_prompt(
    is_mobile: bool,
    can_install: bool,
    cooldown_elapsed: bool,
    already_visible: bool,
) -> bool {
    is_mobile && can_install && cooldown_elapsed && !already_visible
}

/// Whether a manual "show" request may open the snackbar. Ignores the dismissal cooldown.
pub fn should_show_on_request(can_install: bool) -> bool {
    can_install
}

/// Whether the floating button is rendered.
pub fn should_show_fab(can_install: bool, revealed: bool, installing: bool) -> bool {
    (can_install && revealed) || installing
}

/// Toast for a finished install attempt. Dismissals and non-browser hosts stay silent.
pub fn install_result_toast(
    result: &Result<(), InstallRejection>,
) -> Option<(&'static str, FeedbackTone)> {
    match result {
        Ok(()) => Some(("App installed.", FeedbackTone::Success)),
        Err(InstallRejection::UserDismissed | InstallRejection::NotBrowser) => None,
        Err(InstallRejection::AlreadyInstalled) => {
            Some(("The app is already installed.", FeedbackTone::Info))
        }
        Err(InstallRejection::NotMobile) => Some((
            "Installation is available on phones and tablets.",
            FeedbackTone::Info,
        )),
        Err(InstallRejection::NoPrompt) => Some((
            "Your browser isn't offering installation yet. Try again in a moment.",
            FeedbackTone::Warning,
        )),
        Err(InstallRejection::Error) => Some((
            "Installation failed. Please try again.",
            FeedbackTone::Warning,
        )),
    }
}

/// Whether the outcome should restart the automatic prompt cooldown.
pub fn restarts_prompt_cooldown(result: &Result<(), InstallRejection>) -> bool {
    matches!(result, Err(InstallRejection::UserDismissed))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ios_safari_gets_instructions() {
        assert_eq!(
            install_route(PlatformKind::IosSafari),
            InstallRoute::ShareSheetInstructions
        );
        assert_eq!(
            install_route(PlatformKind::StandardBrowser),
            InstallRoute::NativePrompt
        );
        assert!(IOS_INSTALL_INSTRUCTIONS.contains("Add to Home Screen"));
    }

    #[test]
    fn auto_prompt_needs_every_gate() {
        assert!(should_auto_prompt(true, true, true, false));
        assert!(!should_auto_prompt(false, true, true, false));
        assert!(!should_auto_prompt(true, false, true, false));
        assert!(!should_auto_prompt(true, true, false, false));
        assert!(!should_auto_prompt(true, true, true, true));
        assert!(should_show_on_request(true));
    }

    #[test]
    fn fab_stays_while_installing() {
        assert!(should_show_fab(true, true, false));
        assert!(!should_show_fab(true, false, false));
        assert!(!should_show_fab(false, true, false));
        assert!(should_show_fab(false, false, true));
    }

    #[test]
    fn dismissals_are_silent_but_restart_cooldown() {
        let dismissed = Err(InstallRejection::UserDismissed);
        assert_eq!(install_result_toast(&dismissed), None);
        assert!(restarts_prompt_cooldown(&dismissed));

        let failed = Err(InstallRejection::Error);
        assert_eq!(
            install_result_toast(&failed).map(|(_, tone)| tone),
            Some(FeedbackTone::Warning)
        );
        assert!(!restarts_prompt_cooldown(&failed));
        assert_eq!(
            install_result_toast(&Ok(())).map(|(_, tone)| tone),
            Some(FeedbackTone::Success)
        );
    }
}
