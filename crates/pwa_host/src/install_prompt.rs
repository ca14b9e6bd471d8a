//! Native install-prompt contracts (`beforeinstallprompt` / `appinstalled`).

use std::{
    cell::{Cell, RefCell},
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

/// Object-safe boxed future used by [`InstallPromptHandle`].
pub type InstallPromptFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The user's answer to the native install dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallChoice {
    /// The user installed the app.
    Accepted,
    /// The user closed the dialog without installing.
    Dismissed,
}

/// Deferred install gesture handed over by the platform.
pub trait InstallPromptHandle {
    /// Shows the native install dialog and resolves with the user's choice.
    fn prompt(&self) -> InstallPromptFuture<'_, Result<InstallChoice, String>>;
}

/// Callbacks invoked by an [`InstallPromptSource`].
#[derive(Clone)]
pub struct InstallPromptListeners {
    /// Called when the platform offers installation. The source has already suppressed the
    /// browser's own UI for the signal.
    pub on_available: Rc<dyn Fn(Rc<dyn InstallPromptHandle>)>,
    /// Called when the platform reports the app as installed.
    pub on_installed: Rc<dyn Fn()>,
}

impl fmt::Debug for InstallPromptListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallPromptListeners").finish_non_exhaustive()
    }
}

/// Host service delivering native install signals.
pub trait InstallPromptSource {
    /// Registers `listeners` for the lifetime of the page.
    fn listen(&self, listeners: InstallPromptListeners) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Source for hosts that never offer installation.
pub struct NoopInstallPromptSource;

impl InstallPromptSource for NoopInstallPromptSource {
    fn listen(&self, _listeners: InstallPromptListeners) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// Source whose signals are fired by hand; clones share registered listeners.
pub struct MemoryInstallPromptSource {
    listeners: Rc<RefCell<Vec<InstallPromptListeners>>>,
}

impl MemoryInstallPromptSource {
    /// Returns how many listener sets were registered.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers an "install available" signal carrying `handle`.
    pub fn fire_available(&self, handle: Rc<dyn InstallPromptHandle>) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            (listener.on_available)(handle.clone());
        }
    }

    /// Delivers an "app installed" signal.
    pub fn fire_installed(&self) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            (listener.on_installed)();
        }
    }
}

impl InstallPromptSource for MemoryInstallPromptSource {
    fn listen(&self, listeners: InstallPromptListeners) -> Result<(), String> {
        self.listeners.borrow_mut().push(listeners);
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Install prompt with a scripted outcome, used for local simulation and tests.
pub struct SimulatedInstallPrompt {
    outcome: Result<InstallChoice, String>,
    prompt_count: Rc<Cell<u32>>,
}

impl SimulatedInstallPrompt {
    /// Prompt that resolves with `choice`.
    pub fn resolving(choice: InstallChoice) -> Self {
        Self {
            outcome: Ok(choice),
            prompt_count: Rc::new(Cell::new(0)),
        }
    }

    /// Prompt that fails with `message`, as a throwing `prompt()` would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            prompt_count: Rc::new(Cell::new(0)),
        }
    }

    /// Returns how many times the prompt was shown.
    pub fn prompt_count(&self) -> u32 {
        self.prompt_count.get()
    }
}

impl InstallPromptHandle for SimulatedInstallPrompt {
    fn prompt(&self) -> InstallPromptFuture<'_, Result<InstallChoice, String>> {
        self.prompt_count.set(self.prompt_count.get() + 1);
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn simulated_prompt_resolves_scripted_choice_and_counts() {
        let prompt = SimulatedInstallPrompt::resolving(InstallChoice::Dismissed);
        assert_eq!(block_on(prompt.prompt()), Ok(InstallChoice::Dismissed));
        assert_eq!(block_on(prompt.prompt()), Ok(InstallChoice::Dismissed));
        assert_eq!(prompt.prompt_count(), 2);

        let failing = SimulatedInstallPrompt::failing("prompt() already called");
        assert_eq!(
            block_on(failing.prompt()),
            Err("prompt() already called".to_string())
        );
    }

    #[test]
    fn memory_source_fans_out_signals() {
        let source = MemoryInstallPromptSource::default();
        let available = Rc::new(Cell::new(0));
        let installed = Rc::new(Cell::new(0));
        let listeners = InstallPromptListeners {
            on_available: {
                let available = available.clone();
                Rc::new(move |_: Rc<dyn InstallPromptHandle>| {
                    available.set(available.get() + 1)
                })
            },
            on_installed: {
                let installed = installed.clone();
                Rc::new(move || installed.set(installed.get() + 1))
            },
        };
        source.listen(listeners).expect("listen");

        source.fire_available(Rc::new(SimulatedInstallPrompt::resolving(
            InstallChoice::Accepted,
        )));
        source.fire_installed();

        assert_eq!(source.listener_count(), 1);
        assert_eq!(available.get(), 1);
        assert_eq!(installed.get(), 1);
    }

    #[test]
    fn install_choice_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&InstallChoice::Accepted).expect("serialize"),
            "\"accepted\""
        );
    }
}
