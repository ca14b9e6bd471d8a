//! Installability and update coordinator.
//!
//! The coordinator combines platform detection, the captured install prompt, the update channel,
//! and persisted cooldowns into three observable flags: `update_available`, `is_app_installed`,
//! and `show_app_reminder`. It is built once by the composition root and shared by cloning.
//!
//! Whether the host is a browser is decided once at construction. Without a browser the
//! coordinator has no engine: every query answers with a safe default and no action has side
//! effects.
//!
//! The flags are Leptos signals. Invariant: while `is_app_installed` is true there is no captured
//! prompt and `show_app_reminder` is false. Every transition into "installed" writes all three
//! pieces of state inside one `batch`, so effects never observe a partial transition.

use std::{
    cell::Cell,
    rc::{Rc, Weak},
    time::Duration,
};

use leptos::logging::{log, warn};
use leptos::{
    batch, create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet,
};
use pwa_host::{
    DiagnosticsPort, HostStrategy, InstallChoice, PwaEvent, PwaHostServices, SimulatedInstallPrompt,
    TimerId,
};
use serde::{Deserialize, Serialize};

use crate::{
    capture::{CaptureState, InstallPromptCapture},
    config::{PwaConfig, PwaMode, PwaProfile},
    error::{InstallRejection, PwaError},
    platform::{self, AppInstallState, PlatformKind},
    storage::{cooldown_elapsed, PwaStorage},
    update_channel::UpdateChannel,
};

/// Side-effecting half of an active coordinator.
struct Engine {
    services: PwaHostServices,
    storage: PwaStorage,
    capture: InstallPromptCapture,
    updates: UpdateChannel,
    started: Cell<bool>,
    visit_counted: Cell<bool>,
    reminder_timer: Cell<Option<TimerId>>,
}

struct CoordinatorInner {
    mode: PwaMode,
    profile: PwaProfile,
    host_strategy: HostStrategy,
    update_available: ReadSignal<bool>,
    is_app_installed: RwSignal<bool>,
    show_app_reminder: RwSignal<bool>,
    engine: Option<Engine>,
}

/// App-wide PWA coordinator. Clones share state.
#[derive(Clone)]
pub struct PwaCoordinator {
    inner: Rc<CoordinatorInner>,
}

/// Read-only snapshot of every detector output and coordinator flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub mode: PwaMode,
    pub host_strategy: String,
    pub inert: bool,
    pub platform: PlatformKind,
    pub user_agent: String,
    pub viewport_width: Option<f64>,
    pub is_browser: bool,
    pub is_mobile_device: bool,
    pub is_ios_safari: bool,
    pub is_android_chrome: bool,
    pub is_in_webview: bool,
    pub is_secure_context: bool,
    pub has_service_worker_support: bool,
    pub has_valid_manifest_link: bool,
    pub is_local_development: bool,
    pub is_standalone: bool,
    pub has_install_url_marker: bool,
    pub updates_enabled: bool,
    pub capture_state: CaptureState,
    pub app_install_state: AppInstallState,
    pub can_install_app: bool,
    pub update_available: bool,
    pub is_app_installed: bool,
    pub show_app_reminder: bool,
    pub dev_installed: bool,
    pub visit_count: u32,
    pub reminder_shown_at: Option<u64>,
    pub prompt_dismissed_at: Option<u64>,
}

impl PwaCoordinator {
    /// Builds a coordinator whose mode is derived from the page location.
    pub fn new(services: PwaHostServices, config: &PwaConfig) -> Self {
        let mode = PwaMode::detect(services.environment.as_ref());
        Self::with_mode(services, config, mode)
    }

    /// Builds a coordinator in an explicit mode.
    pub fn with_mode(services: PwaHostServices, config: &PwaConfig, mode: PwaMode) -> Self {
        let profile = config.profile(mode).clone();
        let host_strategy = services.host_strategy;

        let engine = services.environment.is_browser().then(|| {
            let updates = UpdateChannel::new(
                services.updates.clone(),
                services.environment.clone(),
                services.scheduler.clone(),
                profile.update_poll_interval(),
            );
            Engine {
                storage: PwaStorage::new(services.store.clone()),
                capture: InstallPromptCapture::new(services.events.clone()),
                updates,
                services,
                started: Cell::new(false),
                visit_counted: Cell::new(false),
                reminder_timer: Cell::new(None),
            }
        });

        let update_available = engine
            .as_ref()
            .map(|engine| engine.updates.update_available())
            .unwrap_or_else(|| create_rw_signal(false).read_only());

        Self {
            inner: Rc::new(CoordinatorInner {
                mode,
                profile,
                host_strategy,
                update_available,
                is_app_installed: create_rw_signal(false),
                show_app_reminder: create_rw_signal(false),
                engine,
            }),
        }
    }

    fn engine(&self) -> Option<&Engine> {
        self.inner.engine.as_ref()
    }

    fn weak(&self) -> Weak<CoordinatorInner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<CoordinatorInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn is_development(&self) -> bool {
        self.inner.mode.is_development()
    }

    fn now_ms(&self, engine: &Engine) -> u64 {
        engine.services.clock.now_ms()
    }

    pub fn mode(&self) -> PwaMode {
        self.inner.mode
    }

    pub fn profile(&self) -> &PwaProfile {
        &self.inner.profile
    }

    /// Platform category of the current page; [`PlatformKind::Server`] when inert.
    pub fn platform_kind(&self) -> PlatformKind {
        self.engine().map_or(PlatformKind::Server, |engine| {
            platform::classify_platform(engine.services.environment.as_ref())
        })
    }

    /// Mobile heuristic of the current page; false when inert.
    pub fn is_mobile_device(&self) -> bool {
        self.engine().is_some_and(|engine| {
            platform::is_mobile_device(engine.services.environment.as_ref())
        })
    }

    /// Returns whether the coordinator was built without a browser.
    pub fn is_inert(&self) -> bool {
        self.inner.engine.is_none()
    }

    /// Observable "a newer version is waiting" flag.
    pub fn update_available(&self) -> ReadSignal<bool> {
        self.inner.update_available
    }

    /// Observable "running as the installed app" flag.
    pub fn is_app_installed(&self) -> ReadSignal<bool> {
        self.inner.is_app_installed.read_only()
    }

    /// Observable "show the install reminder" flag.
    pub fn show_app_reminder(&self) -> ReadSignal<bool> {
        self.inner.show_app_reminder.read_only()
    }

    /// Registers platform listeners, starts update polling, and schedules the reminder.
    ///
    /// Only the first call has an effect.
    pub fn start(&self) {
        let Some(engine) = self.engine() else {
            return;
        };
        if engine.started.replace(true) {
            return;
        }

        let on_available = {
            let weak = self.weak();
            Rc::new(move || {
                if let Some(coordinator) = Self::upgrade(&weak) {
                    coordinator.on_install_available();
                }
            })
        };
        let on_installed = {
            let weak = self.weak();
            Rc::new(move || {
                if let Some(coordinator) = Self::upgrade(&weak) {
                    coordinator.mark_installed(true);
                }
            })
        };
        if let Err(err) = engine.capture.listen(
            engine.services.install_prompts.as_ref(),
            on_available,
            on_installed,
        ) {
            warn!("install prompt listeners could not be registered: {err}");
        }

        engine.updates.start();
        self.refresh_install_state();
        self.schedule_app_reminder();

        if self.is_development() {
            let weak = self.weak();
            engine.services.scheduler.schedule_once(
                self.inner.profile.debug_log_delay(),
                Box::new(move || {
                    if let Some(coordinator) = Self::upgrade(&weak) {
                        coordinator.log_debug_info();
                    }
                }),
            );
        }
    }

    fn on_install_available(&self) {
        if self.is_development() {
            log!("pwa: install prompt captured");
        }
        // A prompt offered to an installed app is never surfaced.
        if self.installed_now() {
            if let Some(engine) = self.engine() {
                engine.capture.clear();
            }
            return;
        }
        // The prompt usually arrives after `start`, when installability was still unknown.
        if !self.reminder_pending() && !self.inner.show_app_reminder.get_untracked() {
            self.schedule_app_reminder();
        }
    }

    fn log_debug_info(&self) {
        match serde_json::to_string_pretty(&self.debug_info()) {
            Ok(json) => log!("pwa status: {json}"),
            Err(err) => warn!("pwa status could not be serialized: {err}"),
        }
    }

    /// Installed according to the cached flag, the environment, or the development override.
    fn installed_now(&self) -> bool {
        let Some(engine) = self.engine() else {
            return false;
        };
        self.inner.is_app_installed.get_untracked()
            || platform::environment_reports_installed(engine.services.environment.as_ref())
            || (self.is_development() && engine.storage.dev_installed())
    }

    /// Re-derives the installed flag from the environment. Never clears it.
    pub fn refresh_install_state(&self) {
        if !self.inner.is_app_installed.get_untracked() && self.installed_now() {
            self.mark_installed(false);
        }
    }

    /// Moves to "installed": no prompt, no reminder, installed flag set, then observers run.
    fn mark_installed(&self, announce: bool) {
        let Some(engine) = self.engine() else {
            return;
        };
        self.cancel_reminder_timer(engine);
        engine.capture.clear();

        let inner = &self.inner;
        batch(|| {
            if !inner.is_app_installed.get_untracked() {
                inner.is_app_installed.set(true);
            }
            if inner.show_app_reminder.get_untracked() {
                inner.show_app_reminder.set(false);
            }
        });
        if announce {
            engine.services.events.emit(PwaEvent::Installed);
        }
    }

    /// Tri-state install status.
    pub fn app_install_state(&self) -> AppInstallState {
        if self.installed_now() {
            AppInstallState::Installed
        } else if self.can_install_app() {
            AppInstallState::Installable
        } else {
            AppInstallState::NotInstallable
        }
    }

    /// Returns whether an install affordance should be offered right now.
    pub fn can_install_app(&self) -> bool {
        let Some(engine) = self.engine() else {
            return false;
        };
        let environment = engine.services.environment.as_ref();
        if !platform::is_browser(environment) || self.installed_now() {
            return false;
        }
        if self.is_development() {
            return !engine.storage.dev_installed();
        }
        if !platform::is_mobile_device(environment) {
            return false;
        }
        if engine.capture.has_prompt() {
            return true;
        }
        // iOS never offers a prompt; installability is inferred.
        if platform::is_ios_safari(environment) {
            return !platform::is_standalone(environment)
                && platform::has_service_worker_support(environment);
        }
        platform::has_service_worker_support(environment)
            && platform::has_valid_manifest_link(environment)
    }

    /// Shows the native install dialog, or simulates an install in development.
    pub async fn install_app(&self) -> Result<(), InstallRejection> {
        let Some(engine) = self.engine() else {
            return Err(InstallRejection::NotBrowser);
        };
        if !platform::is_browser(engine.services.environment.as_ref()) {
            return Err(InstallRejection::NotBrowser);
        }
        if self.installed_now() {
            return Err(InstallRejection::AlreadyInstalled);
        }

        if self.is_development() {
            if let Err(err) = engine.storage.set_dev_installed() {
                warn!("simulated install could not be persisted: {err}");
            }
            self.mark_installed(true);
            log!("pwa: simulated installation");
            return Ok(());
        }

        if !platform::is_mobile_device(engine.services.environment.as_ref()) {
            return Err(InstallRejection::NotMobile);
        }
        let Some(handle) = engine.capture.take() else {
            return Err(InstallRejection::NoPrompt);
        };

        match handle.prompt().await {
            Ok(InstallChoice::Accepted) => {
                self.mark_installed(false);
                Ok(())
            }
            Ok(InstallChoice::Dismissed) => Err(InstallRejection::UserDismissed),
            Err(err) => {
                warn!("install prompt failed: {err}");
                Err(InstallRejection::Error)
            }
        }
    }

    /// Activates a waiting version and reloads the page.
    pub async fn update_app(&self) {
        let Some(engine) = self.engine() else {
            return;
        };
        if !engine.updates.activate_and_reload().await && self.inner.update_available.get_untracked() {
            warn!("update could not be applied; it stays available for retry");
        }
    }

    /// Evaluates the reminder gates and schedules the reminder when they pass.
    ///
    /// `start` calls this, and so does every captured install prompt while no reminder is
    /// pending. Only the first evaluation counts a visit.
    pub fn schedule_app_reminder(&self) {
        let Some(engine) = self.engine() else {
            return;
        };
        if self.installed_now() || !self.reminder_cooldown_elapsed(engine) {
            return;
        }

        let profile = &self.inner.profile;
        if self.is_development() {
            self.arm_reminder(engine, profile.reminder_delay());
            return;
        }

        if !platform::is_mobile_device(engine.services.environment.as_ref()) {
            return;
        }
        let visits = if engine.visit_counted.replace(true) {
            engine.storage.visit_count()
        } else {
            engine.storage.increment_visit_count().unwrap_or_else(|err| {
                warn!("visit count could not be persisted: {err}");
                engine.storage.visit_count()
            })
        };
        if visits < profile.reminder_min_visits || !self.can_install_app() {
            return;
        }
        self.arm_reminder(engine, profile.reminder_delay());
    }

    fn reminder_cooldown_elapsed(&self, engine: &Engine) -> bool {
        cooldown_elapsed(
            engine.storage.reminder_shown_at(),
            self.now_ms(engine),
            self.inner.profile.reminder_cooldown_ms,
        )
    }

    fn arm_reminder(&self, engine: &Engine, delay: Duration) {
        self.cancel_reminder_timer(engine);
        let weak = self.weak();
        let timer = engine.services.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(coordinator) = Self::upgrade(&weak) {
                    coordinator.fire_reminder();
                }
            }),
        );
        engine.reminder_timer.set(Some(timer));
    }

    fn fire_reminder(&self) {
        let Some(engine) = self.engine() else {
            return;
        };
        engine.reminder_timer.set(None);
        if self.installed_now() || !self.reminder_cooldown_elapsed(engine) {
            return;
        }
        self.inner.show_app_reminder.set(true);
    }

    fn cancel_reminder_timer(&self, engine: &Engine) {
        if let Some(timer) = engine.reminder_timer.take() {
            engine.services.scheduler.cancel(timer);
        }
    }

    /// Returns whether a reminder is armed but not shown yet.
    pub fn reminder_pending(&self) -> bool {
        self.engine()
            .is_some_and(|engine| engine.reminder_timer.get().is_some())
    }

    /// Hides the reminder and restarts its cooldown.
    pub fn dismiss_app_reminder(&self) {
        let Some(engine) = self.engine() else {
            return;
        };
        self.cancel_reminder_timer(engine);
        self.inner.show_app_reminder.set(false);
        if let Err(err) = engine.storage.set_reminder_shown_at(self.now_ms(engine)) {
            warn!("reminder dismissal could not be persisted: {err}");
        }
    }

    /// Restarts the automatic install prompt cooldown.
    pub fn dismiss_install_prompt(&self) {
        let Some(engine) = self.engine() else {
            return;
        };
        if let Err(err) = engine.storage.set_prompt_dismissed_at(self.now_ms(engine)) {
            warn!("install prompt dismissal could not be persisted: {err}");
        }
    }

    /// Returns whether the install prompt may be shown automatically again.
    pub fn install_prompt_cooldown_elapsed(&self) -> bool {
        self.engine().is_some_and(|engine| {
            cooldown_elapsed(
                engine.storage.prompt_dismissed_at(),
                self.now_ms(engine),
                self.inner.profile.install_prompt_cooldown_ms,
            )
        })
    }

    fn development_engine(&self, operation: &'static str) -> Result<Option<&Engine>, PwaError> {
        if !self.is_development() {
            return Err(PwaError::DevelopmentOnly { operation });
        }
        Ok(self.engine())
    }

    /// Marks the app installed as if the platform had reported it.
    pub fn simulate_installation(&self) -> Result<(), PwaError> {
        let Some(engine) = self.development_engine("simulate_installation")? else {
            return Ok(());
        };
        engine.storage.set_dev_installed()?;
        self.mark_installed(true);
        Ok(())
    }

    /// Forgets a simulated installation.
    pub fn simulate_uninstallation(&self) -> Result<(), PwaError> {
        let Some(engine) = self.development_engine("simulate_uninstallation")? else {
            return Ok(());
        };
        engine.storage.clear_dev_installed()?;
        self.inner.is_app_installed.set(false);
        self.refresh_install_state();
        Ok(())
    }

    /// Shows the reminder now, unless the app is installed.
    pub fn force_show_reminder(&self) -> Result<(), PwaError> {
        if self.development_engine("force_show_reminder")?.is_none() || self.installed_now() {
            return Ok(());
        }
        self.inner.show_app_reminder.set(true);
        Ok(())
    }

    /// Captures a simulated prompt whose outcome comes from the development profile.
    pub fn force_show_install_prompt(&self) -> Result<(), PwaError> {
        let Some(engine) = self.development_engine("force_show_install_prompt")? else {
            return Ok(());
        };
        if self.installed_now() {
            return Ok(());
        }
        let choice = self.inner.profile.simulated_install_choice;
        engine
            .capture
            .capture(Rc::new(SimulatedInstallPrompt::resolving(choice)));
        Ok(())
    }

    /// Raises the update flag without a new version.
    pub fn force_show_update_banner(&self) -> Result<(), PwaError> {
        if let Some(engine) = self.development_engine("force_show_update_banner")? {
            engine.updates.force_available();
        }
        Ok(())
    }

    /// Deletes every persisted key and resets the flags. Available in every mode.
    ///
    /// In production a captured install prompt survives, since the browser does not offer another
    /// one before the next page load. Development drops it along with the simulated state.
    pub fn clear_pwa_data(&self) -> Result<(), PwaError> {
        let Some(engine) = self.engine() else {
            return Ok(());
        };
        let cleared = engine.storage.clear_all();
        self.cancel_reminder_timer(engine);
        self.inner.show_app_reminder.set(false);
        self.inner.is_app_installed.set(false);
        if self.is_development() {
            engine.updates.reset();
            engine.capture.clear();
        }
        self.refresh_install_state();
        cleared
    }

    /// Snapshot of detector outputs and flags. Reads only.
    pub fn debug_info(&self) -> DebugInfo {
        let Some(engine) = self.engine() else {
            return DebugInfo {
                mode: self.inner.mode,
                host_strategy: self.inner.host_strategy.as_str().to_string(),
                inert: true,
                platform: PlatformKind::Server,
                user_agent: String::new(),
                viewport_width: None,
                is_browser: false,
                is_mobile_device: false,
                is_ios_safari: false,
                is_android_chrome: false,
                is_in_webview: false,
                is_secure_context: false,
                has_service_worker_support: false,
                has_valid_manifest_link: false,
                is_local_development: false,
                is_standalone: false,
                has_install_url_marker: false,
                updates_enabled: false,
                capture_state: CaptureState::NoPrompt,
                app_install_state: AppInstallState::NotInstallable,
                can_install_app: false,
                update_available: false,
                is_app_installed: false,
                show_app_reminder: false,
                dev_installed: false,
                visit_count: 0,
                reminder_shown_at: None,
                prompt_dismissed_at: None,
            };
        };

        let environment = engine.services.environment.as_ref();
        DebugInfo {
            mode: self.inner.mode,
            host_strategy: self.inner.host_strategy.as_str().to_string(),
            inert: false,
            platform: platform::classify_platform(environment),
            user_agent: environment.user_agent(),
            viewport_width: environment.viewport_width(),
            is_browser: platform::is_browser(environment),
            is_mobile_device: platform::is_mobile_device(environment),
            is_ios_safari: platform::is_ios_safari(environment),
            is_android_chrome: platform::is_android_chrome(environment),
            is_in_webview: platform::is_in_webview(environment),
            is_secure_context: platform::is_secure_context(environment),
            has_service_worker_support: platform::has_service_worker_support(environment),
            has_valid_manifest_link: platform::has_valid_manifest_link(environment),
            is_local_development: platform::is_local_development(environment),
            is_standalone: platform::is_standalone(environment),
            has_install_url_marker: platform::has_install_url_marker(environment),
            updates_enabled: engine.updates.is_enabled(),
            capture_state: engine.capture.state(),
            app_install_state: self.app_install_state(),
            can_install_app: self.can_install_app(),
            update_available: self.inner.update_available.get_untracked(),
            is_app_installed: self.inner.is_app_installed.get_untracked(),
            show_app_reminder: self.inner.show_app_reminder.get_untracked(),
            dev_installed: engine.storage.dev_installed(),
            visit_count: engine.storage.visit_count(),
            reminder_shown_at: engine.storage.reminder_shown_at(),
            prompt_dismissed_at: engine.storage.prompt_dismissed_at(),
        }
    }
}

impl DiagnosticsPort for PwaCoordinator {
    fn force_show_update(&self) {
        if let Err(err) = self.force_show_update_banner() {
            warn!("{err}");
        }
    }

    fn force_show_reminder(&self) {
        if let Err(err) = PwaCoordinator::force_show_reminder(self) {
            warn!("{err}");
        }
    }

    fn force_show_install_prompt(&self) {
        if let Err(err) = PwaCoordinator::force_show_install_prompt(self) {
            warn!("{err}");
        }
    }

    fn app_status(&self) -> serde_json::Value {
        serde_json::to_value(self.debug_info()).unwrap_or(serde_json::Value::Null)
    }
}
