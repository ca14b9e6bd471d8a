//! New-version detection and activation.
//!
//! Listens to the update source's version lifecycle and polls it while the page is visible.
//! Only a "version ready" event raises `update_available`; only a successful activation clears
//! it.

use std::{
    cell::Cell,
    rc::{Rc, Weak},
    time::Duration,
};

use leptos::logging::{log, warn};
use leptos::{create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet};
use pwa_host::{EnvironmentSource, TaskScheduler, TimerId, UpdateSource, VersionEvent};

struct ChannelInner {
    source: Rc<dyn UpdateSource>,
    environment: Rc<dyn EnvironmentSource>,
    scheduler: Rc<dyn TaskScheduler>,
    poll_interval: Duration,
    update_available: RwSignal<bool>,
    started: Cell<bool>,
    poll_timer: Cell<Option<TimerId>>,
}

/// Service-worker update channel. Clones share state.
#[derive(Clone)]
pub struct UpdateChannel {
    inner: Rc<ChannelInner>,
}

impl UpdateChannel {
    pub fn new(
        source: Rc<dyn UpdateSource>,
        environment: Rc<dyn EnvironmentSource>,
        scheduler: Rc<dyn TaskScheduler>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                source,
                environment,
                scheduler,
                poll_interval,
                update_available: create_rw_signal(false),
                started: Cell::new(false),
                poll_timer: Cell::new(None),
            }),
        }
    }

    /// Observable "a newer version is waiting" flag.
    pub fn update_available(&self) -> ReadSignal<bool> {
        self.inner.update_available.read_only()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.source.is_enabled()
    }

    /// Subscribes to version events and starts polling. Does nothing when updates are disabled
    /// or the channel already started.
    pub fn start(&self) {
        if !self.is_enabled() || self.inner.started.replace(true) {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let on_event: Rc<dyn Fn(VersionEvent)> = Rc::new(move |event: VersionEvent| {
            if let Some(channel) = upgrade(&weak) {
                channel.handle_event(&event);
            }
        });
        if let Err(err) = self.inner.source.listen(on_event) {
            warn!("update channel could not subscribe to version events: {err}");
        }

        let weak = Rc::downgrade(&self.inner);
        let timer = self.inner.scheduler.schedule_repeating(
            self.inner.poll_interval,
            Rc::new(move || {
                if let Some(channel) = upgrade(&weak) {
                    channel.poll();
                }
            }),
        );
        self.inner.poll_timer.set(Some(timer));
    }

    pub fn is_polling(&self) -> bool {
        self.inner.poll_timer.get().is_some()
    }

    pub fn handle_event(&self, event: &VersionEvent) {
        match event {
            VersionEvent::VersionReady => {
                log!("new app version ready");
                self.inner.update_available.set(true);
            }
            VersionEvent::VersionInstallationFailed { error } => {
                warn!("new app version failed to install: {error}");
            }
            VersionEvent::VersionDetected | VersionEvent::NoNewVersionDetected => {}
        }
    }

    /// One polling tick: checks for a new version unless the page is hidden.
    pub fn poll(&self) {
        if self.inner.environment.is_document_hidden() {
            return;
        }
        let channel = self.clone();
        self.inner.scheduler.spawn(Box::pin(async move {
            channel.check_now().await;
        }));
    }

    /// Asks the source for a new version. Failures are logged and read as "nothing new".
    pub async fn check_now(&self) -> bool {
        match self.inner.source.check_for_update().await {
            Ok(found) => found,
            Err(err) => {
                warn!("update check failed: {err}");
                false
            }
        }
    }

    /// Activates the waiting version and reloads. Returns whether a reload was requested.
    ///
    /// Without a waiting version the activation API is not called. On failure the flag stays
    /// set so the user can retry.
    pub async fn activate_and_reload(&self) -> bool {
        if !self.inner.update_available.get_untracked() {
            return false;
        }
        match self.inner.source.activate_update().await {
            Ok(_) => {
                self.inner.update_available.set(false);
                self.inner.source.reload_page();
                true
            }
            Err(err) => {
                warn!("update activation failed: {err}");
                false
            }
        }
    }

    /// Raises the flag without a version event.
    pub fn force_available(&self) {
        self.inner.update_available.set(true);
    }

    /// Lowers the flag without activating anything.
    pub fn reset(&self) {
        self.inner.update_available.set(false);
    }
}

fn upgrade(weak: &Weak<ChannelInner>) -> Option<UpdateChannel> {
    weak.upgrade().map(|inner| UpdateChannel { inner })
}
