//! Development diagnostics port, exposed on the page only when explicitly wired.

/// Operations reachable from the development debug global.
pub trait DiagnosticsPort {
    /// Forces the "new version available" banner.
    fn force_show_update(&self);

    /// Forces the install reminder.
    fn force_show_reminder(&self);

    /// Captures a simulated install prompt as if the platform had offered one.
    fn force_show_install_prompt(&self);

    /// Returns a JSON snapshot of platform detection and PWA state.
    fn app_status(&self) -> serde_json::Value;
}
