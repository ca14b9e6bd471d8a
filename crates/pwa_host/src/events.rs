//! Page-level notifications emitted when installability changes.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

/// Payload-free notifications broadcast to any interested listener on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PwaEvent {
    /// A native install prompt was captured and can be offered.
    InstallAvailable,
    /// The app became installed through any path.
    Installed,
}

impl PwaEvent {
    /// Returns the DOM `CustomEvent` type dispatched on `window`.
    pub const fn dom_event_name(self) -> &'static str {
        match self {
            Self::InstallAvailable => "pwa-install-available",
            Self::Installed => "pwa-installed",
        }
    }
}

/// Host service that broadcasts [`PwaEvent`] values.
pub trait PwaEventSink {
    /// Broadcasts `event`. Delivery failures are the sink's concern.
    fn emit(&self, event: PwaEvent);
}

#[derive(Debug, Clone, Copy, Default)]
/// Sink that drops every event.
pub struct NoopPwaEventSink;

impl PwaEventSink for NoopPwaEventSink {
    fn emit(&self, _event: PwaEvent) {}
}

#[derive(Debug, Clone, Default)]
/// Sink that records events in order; clones share the log.
pub struct MemoryPwaEventSink {
    emitted: Rc<RefCell<Vec<PwaEvent>>>,
}

impl MemoryPwaEventSink {
    /// Returns every event emitted so far.
    pub fn emitted(&self) -> Vec<PwaEvent> {
        self.emitted.borrow().clone()
    }

    /// Returns how many times `event` was emitted.
    pub fn count(&self, event: PwaEvent) -> usize {
        self.emitted.borrow().iter().filter(|e| **e == event).count()
    }
}

impl PwaEventSink for MemoryPwaEventSink {
    fn emit(&self, event: PwaEvent) {
        self.emitted.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_event_names_are_stable() {
        assert_eq!(
            PwaEvent::InstallAvailable.dom_event_name(),
            "pwa-install-available"
        );
        assert_eq!(PwaEvent::Installed.dom_event_name(), "pwa-installed");
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemoryPwaEventSink::default();
        sink.emit(PwaEvent::InstallAvailable);
        sink.emit(PwaEvent::Installed);
        assert_eq!(
            sink.emitted(),
            vec![PwaEvent::InstallAvailable, PwaEvent::Installed]
        );
        assert_eq!(sink.count(PwaEvent::Installed), 1);
    }
}
