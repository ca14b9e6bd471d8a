//! Fully in-memory host used by tests and local simulation.

use std::rc::Rc;

use crate::{
    EnvironmentSnapshot, HostStrategy, ManualClock, MemoryEnvironmentSource,
    MemoryInstallPromptSource, MemoryPwaEventSink, MemoryPwaStore, MemoryTaskScheduler,
    MemoryUpdateSource, PwaHostServices,
};

/// In-memory adapters for every host contract, sharing one manual clock.
///
/// Keep the `MemoryHost` around after calling [`MemoryHost::services`]: its handles drive the
/// platform side (firing install signals, emitting version events, advancing time).
#[derive(Clone)]
pub struct MemoryHost {
    /// Mutable environment facts.
    pub environment: MemoryEnvironmentSource,
    /// Inspectable key/value store.
    pub store: MemoryPwaStore,
    /// Hand-fired install signals.
    pub install_prompts: MemoryInstallPromptSource,
    /// Scripted update mechanism.
    pub updates: MemoryUpdateSource,
    /// Recorded page events.
    pub events: MemoryPwaEventSink,
    /// Deterministic timers.
    pub scheduler: MemoryTaskScheduler,
    /// Clock shared by the scheduler and cooldown arithmetic.
    pub clock: ManualClock,
}

impl MemoryHost {
    /// Creates a host for `snapshot` with the clock at `now_ms`.
    pub fn new(snapshot: EnvironmentSnapshot, now_ms: u64) -> Self {
        let clock = ManualClock::starting_at(now_ms);
        Self {
            environment: MemoryEnvironmentSource::new(snapshot),
            store: MemoryPwaStore::default(),
            install_prompts: MemoryInstallPromptSource::default(),
            updates: MemoryUpdateSource::default(),
            events: MemoryPwaEventSink::default(),
            scheduler: MemoryTaskScheduler::new(clock.clone()),
            clock,
        }
    }

    /// Builds a service bundle backed by this host's adapters.
    pub fn services(&self) -> PwaHostServices {
        PwaHostServices {
            environment: Rc::new(self.environment.clone()),
            store: Rc::new(self.store.clone()),
            install_prompts: Rc::new(self.install_prompts.clone()),
            updates: Rc::new(self.updates.clone()),
            events: Rc::new(self.events.clone()),
            scheduler: Rc::new(self.scheduler.clone()),
            clock: Rc::new(self.clock.clone()),
            host_strategy: HostStrategy::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{Clock, PwaStore};

    #[test]
    fn services_share_state_with_host_handles() {
        let host = MemoryHost::new(
            EnvironmentSnapshot::browser("Mozilla/5.0", "example.com", 1280.0),
            5_000,
        );
        let services = host.services();

        services.store.save_value("k", "v").expect("save");
        assert_eq!(host.store.peek("k"), Some("v".to_string()));

        host.scheduler.advance(Duration::from_secs(1));
        assert_eq!(services.clock.now_ms(), 6_000);
        assert_eq!(services.host_strategy, HostStrategy::Memory);
    }
}
