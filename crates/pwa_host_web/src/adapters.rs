use std::rc::Rc;

use pwa_host::{
    EnvironmentSource, HostStrategy, InstallPromptListeners, InstallPromptSource,
    NoopEnvironmentSource, NoopInstallPromptSource, NoopPwaEventSink, NoopPwaStore,
    NoopTaskScheduler, NoopUpdateSource, PageLocation, PwaEvent, PwaEventSink, PwaHostServices,
    PwaStore, SpawnedTask, SystemClock, TaskScheduler, TimerId, UpdateFuture, UpdateSource,
    VersionEvent,
};

use crate::{
    WebEnvironmentSource, WebInstallPromptSource, WebPwaEventSink, WebPwaStore, WebTaskScheduler,
    WebUpdateSource,
};

/// Returns the compile-time selected host strategy for the active build.
///
/// Browser adapters are selected for `wasm32` builds unless the `inert-host` feature forces the
/// no-op adapters (static prerendering, headless smoke builds).
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "inert-host")]
    {
        HostStrategy::Inert
    }

    #[cfg(all(not(feature = "inert-host"), target_arch = "wasm32"))]
    {
        HostStrategy::Browser
    }

    #[cfg(all(not(feature = "inert-host"), not(target_arch = "wasm32")))]
    {
        HostStrategy::Inert
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete environment source behind [`EnvironmentSource`].
#[derive(Debug, Clone, Copy)]
pub enum EnvironmentSourceAdapter {
    /// Live DOM source.
    Browser(WebEnvironmentSource),
    /// No browser present.
    Inert(NoopEnvironmentSource),
}

impl EnvironmentSourceAdapter {
    fn source(&self) -> &dyn EnvironmentSource {
        match self {
            Self::Browser(source) => source,
            Self::Inert(source) => source,
        }
    }
}

impl EnvironmentSource for EnvironmentSourceAdapter {
    fn is_browser(&self) -> bool {
        self.source().is_browser()
    }

    fn user_agent(&self) -> String {
        self.source().user_agent()
    }

    fn viewport_width(&self) -> Option<f64> {
        self.source().viewport_width()
    }

    fn has_touch_support(&self) -> bool {
        self.source().has_touch_support()
    }

    fn secure_context_flag(&self) -> bool {
        self.source().secure_context_flag()
    }

    fn location(&self) -> Option<PageLocation> {
        self.source().location()
    }

    fn display_mode_standalone(&self) -> bool {
        self.source().display_mode_standalone()
    }

    fn navigator_standalone(&self) -> bool {
        self.source().navigator_standalone()
    }

    fn has_service_worker_api(&self) -> bool {
        self.source().has_service_worker_api()
    }

    fn has_manifest_link(&self) -> bool {
        self.source().has_manifest_link()
    }

    fn is_document_hidden(&self) -> bool {
        self.source().is_document_hidden()
    }
}

/// Adapter enum that erases the concrete key/value backend behind [`PwaStore`].
#[derive(Debug, Clone, Copy)]
pub enum PwaStoreAdapter {
    /// `localStorage`-backed store.
    Browser(WebPwaStore),
    /// No persistence.
    Inert(NoopPwaStore),
}

impl PwaStore for PwaStoreAdapter {
    fn load_value(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.load_value(key),
            Self::Inert(store) => store.load_value(key),
        }
    }

    fn save_value(&self, key: &str, value: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.save_value(key, value),
            Self::Inert(store) => store.save_value(key, value),
        }
    }

    fn delete_value(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.delete_value(key),
            Self::Inert(store) => store.delete_value(key),
        }
    }
}

/// Adapter enum that erases the concrete install-signal source behind [`InstallPromptSource`].
#[derive(Debug, Clone, Copy)]
pub enum InstallPromptSourceAdapter {
    /// `beforeinstallprompt` / `appinstalled` window listeners.
    Browser(WebInstallPromptSource),
    /// Never signals.
    Inert(NoopInstallPromptSource),
}

impl InstallPromptSource for InstallPromptSourceAdapter {
    fn listen(&self, listeners: InstallPromptListeners) -> Result<(), String> {
        match self {
            Self::Browser(source) => source.listen(listeners),
            Self::Inert(source) => source.listen(listeners),
        }
    }
}

/// Adapter enum that erases the concrete update mechanism behind [`UpdateSource`].
#[derive(Debug, Clone, Copy)]
pub enum UpdateSourceAdapter {
    /// Service-worker registration backed updates.
    Browser(WebUpdateSource),
    /// Updates disabled.
    Inert(NoopUpdateSource),
}

impl UpdateSource for UpdateSourceAdapter {
    fn is_enabled(&self) -> bool {
        match self {
            Self::Browser(source) => source.is_enabled(),
            Self::Inert(source) => source.is_enabled(),
        }
    }

    fn listen(&self, on_event: Rc<dyn Fn(VersionEvent)>) -> Result<(), String> {
        match self {
            Self::Browser(source) => source.listen(on_event),
            Self::Inert(source) => source.listen(on_event),
        }
    }

    fn check_for_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        match self {
            Self::Browser(source) => source.check_for_update(),
            Self::Inert(source) => source.check_for_update(),
        }
    }

    fn activate_update(&self) -> UpdateFuture<'_, Result<bool, String>> {
        match self {
            Self::Browser(source) => source.activate_update(),
            Self::Inert(source) => source.activate_update(),
        }
    }

    fn reload_page(&self) {
        match self {
            Self::Browser(source) => source.reload_page(),
            Self::Inert(source) => source.reload_page(),
        }
    }
}

/// Adapter enum that erases the concrete event sink behind [`PwaEventSink`].
#[derive(Debug, Clone, Copy)]
pub enum PwaEventSinkAdapter {
    /// DOM `CustomEvent` dispatch.
    Browser(WebPwaEventSink),
    /// Drops events.
    Inert(NoopPwaEventSink),
}

impl PwaEventSink for PwaEventSinkAdapter {
    fn emit(&self, event: PwaEvent) {
        match self {
            Self::Browser(sink) => sink.emit(event),
            Self::Inert(sink) => sink.emit(event),
        }
    }
}

/// Adapter enum that erases the concrete scheduler behind [`TaskScheduler`].
#[derive(Clone)]
pub enum TaskSchedulerAdapter {
    /// `setTimeout` / `setInterval` / `spawn_local`.
    Browser(WebTaskScheduler),
    /// Never runs anything.
    Inert(NoopTaskScheduler),
}

impl TaskScheduler for TaskSchedulerAdapter {
    fn schedule_once(&self, delay: std::time::Duration, task: Box<dyn FnOnce()>) -> TimerId {
        match self {
            Self::Browser(scheduler) => scheduler.schedule_once(delay, task),
            Self::Inert(scheduler) => scheduler.schedule_once(delay, task),
        }
    }

    fn schedule_repeating(&self, every: std::time::Duration, task: Rc<dyn Fn()>) -> TimerId {
        match self {
            Self::Browser(scheduler) => scheduler.schedule_repeating(every, task),
            Self::Inert(scheduler) => scheduler.schedule_repeating(every, task),
        }
    }

    fn cancel(&self, id: TimerId) {
        match self {
            Self::Browser(scheduler) => scheduler.cancel(id),
            Self::Inert(scheduler) => scheduler.cancel(id),
        }
    }

    fn spawn(&self, task: SpawnedTask) {
        match self {
            Self::Browser(scheduler) => scheduler.spawn(task),
            Self::Inert(scheduler) => scheduler.spawn(task),
        }
    }
}

fn is_browser(strategy: HostStrategy) -> bool {
    matches!(strategy, HostStrategy::Browser)
}

fn environment_source_for(strategy: HostStrategy) -> EnvironmentSourceAdapter {
    if is_browser(strategy) {
        EnvironmentSourceAdapter::Browser(WebEnvironmentSource)
    } else {
        EnvironmentSourceAdapter::Inert(NoopEnvironmentSource)
    }
}

/// Builds the environment source for the compile-time selected host strategy.
pub fn environment_source() -> EnvironmentSourceAdapter {
    environment_source_for(selected_host_strategy())
}

fn pwa_store_for(strategy: HostStrategy) -> PwaStoreAdapter {
    if is_browser(strategy) {
        PwaStoreAdapter::Browser(WebPwaStore)
    } else {
        PwaStoreAdapter::Inert(NoopPwaStore)
    }
}

/// Builds the key/value store for the compile-time selected host strategy.
pub fn pwa_store() -> PwaStoreAdapter {
    pwa_store_for(selected_host_strategy())
}

fn install_prompt_source_for(strategy: HostStrategy) -> InstallPromptSourceAdapter {
    if is_browser(strategy) {
        InstallPromptSourceAdapter::Browser(WebInstallPromptSource)
    } else {
        InstallPromptSourceAdapter::Inert(NoopInstallPromptSource)
    }
}

/// Builds the install-signal source for the compile-time selected host strategy.
pub fn install_prompt_source() -> InstallPromptSourceAdapter {
    install_prompt_source_for(selected_host_strategy())
}

fn update_source_for(strategy: HostStrategy) -> UpdateSourceAdapter {
    if is_browser(strategy) {
        UpdateSourceAdapter::Browser(WebUpdateSource)
    } else {
        UpdateSourceAdapter::Inert(NoopUpdateSource)
    }
}

/// Builds the update source for the compile-time selected host strategy.
pub fn update_source() -> UpdateSourceAdapter {
    update_source_for(selected_host_strategy())
}

fn event_sink_for(strategy: HostStrategy) -> PwaEventSinkAdapter {
    if is_browser(strategy) {
        PwaEventSinkAdapter::Browser(WebPwaEventSink)
    } else {
        PwaEventSinkAdapter::Inert(NoopPwaEventSink)
    }
}

/// Builds the event sink for the compile-time selected host strategy.
pub fn event_sink() -> PwaEventSinkAdapter {
    event_sink_for(selected_host_strategy())
}

fn task_scheduler_for(strategy: HostStrategy) -> TaskSchedulerAdapter {
    if is_browser(strategy) {
        TaskSchedulerAdapter::Browser(WebTaskScheduler::default())
    } else {
        TaskSchedulerAdapter::Inert(NoopTaskScheduler)
    }
}

/// Builds the task scheduler for the compile-time selected host strategy.
pub fn task_scheduler() -> TaskSchedulerAdapter {
    task_scheduler_for(selected_host_strategy())
}

fn build_pwa_host_services_for(strategy: HostStrategy) -> PwaHostServices {
    PwaHostServices {
        environment: Rc::new(environment_source_for(strategy)),
        store: Rc::new(pwa_store_for(strategy)),
        install_prompts: Rc::new(install_prompt_source_for(strategy)),
        updates: Rc::new(update_source_for(strategy)),
        events: Rc::new(event_sink_for(strategy)),
        scheduler: Rc::new(task_scheduler_for(strategy)),
        clock: Rc::new(SystemClock),
        host_strategy: if is_browser(strategy) {
            HostStrategy::Browser
        } else {
            HostStrategy::Inert
        },
    }
}

/// Assembles the full host service bundle for the compile-time selected host strategy.
pub fn build_pwa_host_services() -> PwaHostServices {
    build_pwa_host_services_for(selected_host_strategy())
}
