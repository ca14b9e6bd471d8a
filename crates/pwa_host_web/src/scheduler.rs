//! `setTimeout` / `setInterval` backed task scheduler.

use std::{rc::Rc, time::Duration};

use pwa_host::{SpawnedTask, TaskScheduler, TimerId};

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, collections::HashMap};

#[derive(Clone, Default)]
/// Browser scheduler. Interval closures are owned here and released on cancel.
pub struct WebTaskScheduler {
    #[cfg(target_arch = "wasm32")]
    intervals: Rc<RefCell<HashMap<i32, wasm_bindgen::closure::Closure<dyn FnMut()>>>>,
}

#[cfg(target_arch = "wasm32")]
fn millis(duration: Duration) -> i32 {
    duration.as_millis().min(i32::MAX as u128) as i32
}

impl TaskScheduler for WebTaskScheduler {
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::{closure::Closure, JsCast};

            let Some(window) = web_sys::window() else {
                return TimerId(0);
            };
            let callback = Closure::once_into_js(move || task());
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    millis(delay),
                )
                .map(|handle| TimerId(handle as u64))
                .unwrap_or(TimerId(0))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (delay, task);
            TimerId(0)
        }
    }

    fn schedule_repeating(&self, every: Duration, task: Rc<dyn Fn()>) -> TimerId {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::{closure::Closure, JsCast};

            let Some(window) = web_sys::window() else {
                return TimerId(0);
            };
            let callback = Closure::<dyn FnMut()>::new(move || task());
            let Ok(handle) = window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis(every),
            ) else {
                return TimerId(0);
            };
            self.intervals.borrow_mut().insert(handle, callback);
            TimerId(handle as u64)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (every, task);
            TimerId(0)
        }
    }

    fn cancel(&self, id: TimerId) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let handle = id.0 as i32;
            if self.intervals.borrow_mut().remove(&handle).is_some() {
                window.clear_interval_with_handle(handle);
            } else {
                window.clear_timeout_with_handle(handle);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = id;
        }
    }

    fn spawn(&self, task: SpawnedTask) {
        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(task);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = task;
        }
    }
}
