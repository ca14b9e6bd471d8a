//! Deferred install-prompt capture.
//!
//! Holds the platform's install gesture between the "before install" signal and the moment the
//! coordinator consumes it. The browser adapter has already suppressed the native mini-infobar
//! by the time a handle arrives here.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use pwa_host::{InstallPromptHandle, InstallPromptListeners, InstallPromptSource, PwaEvent, PwaEventSink};
use serde::{Deserialize, Serialize};

/// Observable capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    NoPrompt,
    PromptAvailable,
}

struct CaptureInner {
    handle: RefCell<Option<Rc<dyn InstallPromptHandle>>>,
    listening: Cell<bool>,
    events: Rc<dyn PwaEventSink>,
}

/// Owner of the deferred install prompt handle. Clones share the same slot.
#[derive(Clone)]
pub struct InstallPromptCapture {
    inner: Rc<CaptureInner>,
}

impl fmt::Debug for InstallPromptCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallPromptCapture")
            .field("state", &self.state())
            .field("listening", &self.inner.listening.get())
            .finish()
    }
}

impl InstallPromptCapture {
    pub fn new(events: Rc<dyn PwaEventSink>) -> Self {
        Self {
            inner: Rc::new(CaptureInner {
                handle: RefCell::new(None),
                listening: Cell::new(false),
                events,
            }),
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.inner.handle.borrow().is_some() {
            CaptureState::PromptAvailable
        } else {
            CaptureState::NoPrompt
        }
    }

    pub fn has_prompt(&self) -> bool {
        self.state() == CaptureState::PromptAvailable
    }

    /// Stores `handle`, replacing any earlier one, and announces `pwa-install-available`.
    pub fn capture(&self, handle: Rc<dyn InstallPromptHandle>) {
        self.inner.handle.replace(Some(handle));
        self.inner.events.emit(PwaEvent::InstallAvailable);
    }

    /// Removes and returns the handle for a single use.
    pub fn take(&self) -> Option<Rc<dyn InstallPromptHandle>> {
        self.inner.handle.borrow_mut().take()
    }

    pub fn clear(&self) {
        self.inner.handle.replace(None);
    }

    /// Registers with `source` once; later calls return `Ok(false)` without registering again.
    ///
    /// `on_available` runs after a handle was captured. `on_installed` runs after the handle was
    /// dropped in response to the platform's "installed" signal.
    pub fn listen(
        &self,
        source: &dyn InstallPromptSource,
        on_available: Rc<dyn Fn()>,
        on_installed: Rc<dyn Fn()>,
    ) -> Result<bool, String> {
        if self.inner.listening.replace(true) {
            return Ok(false);
        }

        let available_capture = self.clone();
        let installed_capture = self.clone();
        let listeners = InstallPromptListeners {
            on_available: Rc::new(move |handle: Rc<dyn InstallPromptHandle>| {
                available_capture.capture(handle);
                on_available();
            }),
            on_installed: Rc::new(move || {
                installed_capture.clear();
                on_installed();
            }),
        };

        source.listen(listeners).inspect_err(|_| {
            self.inner.listening.set(false);
        })?;
        Ok(true)
    }

    pub fn is_listening(&self) -> bool {
        self.inner.listening.get()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pwa_host::{
        InstallChoice, MemoryInstallPromptSource, MemoryPwaEventSink, SimulatedInstallPrompt,
    };

    use super::*;

    fn capture() -> (MemoryPwaEventSink, InstallPromptCapture) {
        let events = MemoryPwaEventSink::default();
        let capture = InstallPromptCapture::new(Rc::new(events.clone()));
        (events, capture)
    }

    fn prompt() -> Rc<dyn InstallPromptHandle> {
        Rc::new(SimulatedInstallPrompt::resolving(InstallChoice::Accepted))
    }

    #[test]
    fn available_signal_stores_handle_and_announces_it() {
        let (events, capture) = capture();
        let source = MemoryInstallPromptSource::default();
        let notified = Rc::new(Cell::new(0));
        let on_available = {
            let notified = notified.clone();
            Rc::new(move || notified.set(notified.get() + 1))
        };
        capture
            .listen(&source, on_available, Rc::new(|| {}))
            .expect("listen");

        source.fire_available(prompt());
        assert_eq!(capture.state(), CaptureState::PromptAvailable);
        assert_eq!(events.emitted(), vec![PwaEvent::InstallAvailable]);
        assert_eq!(notified.get(), 1);
    }

    #[test]
    fn installed_signal_drops_handle_before_callback() {
        let (_events, capture) = capture();
        let source = MemoryInstallPromptSource::default();
        let seen_state = Rc::new(Cell::new(None));
        let on_installed = {
            let capture = capture.clone();
            let seen_state = seen_state.clone();
            Rc::new(move || seen_state.set(Some(capture.state())))
        };
        capture
            .listen(&source, Rc::new(|| {}), on_installed)
            .expect("listen");

        source.fire_available(prompt());
        source.fire_installed();
        assert_eq!(seen_state.get(), Some(CaptureState::NoPrompt));
    }

    #[test]
    fn listeners_register_once() {
        let (_events, capture) = capture();
        let source = MemoryInstallPromptSource::default();
        assert_eq!(capture.listen(&source, Rc::new(|| {}), Rc::new(|| {})), Ok(true));
        assert_eq!(capture.listen(&source, Rc::new(|| {}), Rc::new(|| {})), Ok(false));
        assert_eq!(source.listener_count(), 1);
        assert!(capture.is_listening());
    }

    #[test]
    fn take_consumes_the_handle() {
        let (_events, capture) = capture();
        capture.capture(prompt());
        assert!(capture.take().is_some());
        assert!(capture.take().is_none());
        assert!(!capture.has_prompt());
    }
}
