//! Timer and task-spawning contracts.
//!
//! The browser adapter maps these onto `setTimeout`/`setInterval` and `spawn_local`. The
//! in-memory scheduler runs on a [`ManualClock`] so timer-driven behaviour can be stepped
//! deterministically.

use std::{
    cell::{Cell, RefCell},
    future::Future,
    pin::Pin,
    rc::Rc,
    time::Duration,
};

use futures::{
    executor::{LocalPool, LocalSpawner},
    task::LocalSpawnExt,
};

use crate::time::{Clock, ManualClock};

/// Boxed `'static` future handed to [`TaskScheduler::spawn`].
pub type SpawnedTask = Pin<Box<dyn Future<Output = ()>>>;

/// Opaque identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Host service for delayed, repeating, and asynchronous work on the UI thread.
pub trait TaskScheduler {
    /// Runs `task` once after `delay`.
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId;

    /// Runs `task` every `every` until cancelled.
    fn schedule_repeating(&self, every: Duration, task: Rc<dyn Fn()>) -> TimerId;

    /// Cancels a pending timer. Unknown or already-fired ids are ignored.
    fn cancel(&self, id: TimerId);

    /// Drives `task` to completion on the local executor.
    fn spawn(&self, task: SpawnedTask);
}

#[derive(Debug, Clone, Copy, Default)]
/// Scheduler that never runs anything.
pub struct NoopTaskScheduler;

impl TaskScheduler for NoopTaskScheduler {
    fn schedule_once(&self, _delay: Duration, _task: Box<dyn FnOnce()>) -> TimerId {
        TimerId(0)
    }

    fn schedule_repeating(&self, _every: Duration, _task: Rc<dyn Fn()>) -> TimerId {
        TimerId(0)
    }

    fn cancel(&self, _id: TimerId) {}

    fn spawn(&self, _task: SpawnedTask) {}
}

enum TimerTask {
    Once(Box<dyn FnOnce()>),
    Repeating(Rc<dyn Fn()>),
}

struct PendingTimer {
    id: TimerId,
    due_ms: u64,
    every_ms: u64,
    task: TimerTask,
}

struct MemorySchedulerState {
    clock: ManualClock,
    next_id: Cell<u64>,
    timers: RefCell<Vec<PendingTimer>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

#[derive(Clone)]
/// Deterministic scheduler driven by [`MemoryTaskScheduler::advance`]; clones share state.
pub struct MemoryTaskScheduler {
    inner: Rc<MemorySchedulerState>,
}

impl Default for MemoryTaskScheduler {
    fn default() -> Self {
        Self::new(ManualClock::default())
    }
}

impl MemoryTaskScheduler {
    /// Creates a scheduler whose timers fire against `clock`.
    pub fn new(clock: ManualClock) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            inner: Rc::new(MemorySchedulerState {
                clock,
                next_id: Cell::new(1),
                timers: RefCell::new(Vec::new()),
                pool: RefCell::new(pool),
                spawner,
            }),
        }
    }

    /// Returns the clock timers are measured against.
    pub fn clock(&self) -> ManualClock {
        self.inner.clock.clone()
    }

    /// Returns the number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Returns whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.timers.borrow().iter().any(|timer| timer.id == id)
    }

    /// Polls spawned tasks until none can make progress.
    pub fn run_until_stalled(&self) {
        self.inner.pool.borrow_mut().run_until_stalled();
    }

    /// Moves the clock forward by `delta`, firing due timers in deadline order.
    ///
    /// Spawned tasks are polled after every fired timer and once more at the end.
    pub fn advance(&self, delta: Duration) {
        let target = self
            .inner
            .clock
            .now_ms()
            .saturating_add(delta.as_millis() as u64);

        while let Some(timer) = self.take_next_due(target) {
            self.inner.clock.set(timer.due_ms);
            match timer.task {
                TimerTask::Once(task) => task(),
                TimerTask::Repeating(task) => {
                    self.inner.timers.borrow_mut().push(PendingTimer {
                        id: timer.id,
                        due_ms: timer.due_ms.saturating_add(timer.every_ms),
                        every_ms: timer.every_ms,
                        task: TimerTask::Repeating(task.clone()),
                    });
                    task();
                }
            }
            self.run_until_stalled();
        }

        self.inner.clock.set(target);
        self.run_until_stalled();
    }

    fn take_next_due(&self, target_ms: u64) -> Option<PendingTimer> {
        let mut timers = self.inner.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= target_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.id.0))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }

    fn next_id(&self) -> TimerId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        TimerId(id)
    }

    fn push(&self, delay_ms: u64, every_ms: u64, task: TimerTask) -> TimerId {
        let id = self.next_id();
        let due_ms = self.inner.clock.now_ms().saturating_add(delay_ms);
        self.inner.timers.borrow_mut().push(PendingTimer {
            id,
            due_ms,
            every_ms,
            task,
        });
        id
    }
}

impl TaskScheduler for MemoryTaskScheduler {
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        self.push(delay.as_millis() as u64, 0, TimerTask::Once(task))
    }

    fn schedule_repeating(&self, every: Duration, task: Rc<dyn Fn()>) -> TimerId {
        // A zero period would spin `advance` forever.
        let every_ms = (every.as_millis() as u64).max(1);
        self.push(every_ms, every_ms, TimerTask::Repeating(task))
    }

    fn cancel(&self, id: TimerId) {
        self.inner.timers.borrow_mut().retain(|timer| timer.id != id);
    }

    fn spawn(&self, task: SpawnedTask) {
        // Spawning only fails once the pool is dropped, which outlives every handle here.
        let _ = self.inner.spawner.spawn_local(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + Clone) {
        let count = Rc::new(Cell::new(0));
        let bump = {
            let count = count.clone();
            move || count.set(count.get() + 1)
        };
        (count, bump)
    }

    #[test]
    fn once_timers_fire_at_deadline_and_only_once() {
        let scheduler = MemoryTaskScheduler::new(ManualClock::starting_at(10_000));
        let (count, bump) = counter();
        scheduler.schedule_once(Duration::from_secs(3), Box::new(bump));

        scheduler.advance(Duration::from_millis(2_999));
        assert_eq!(count.get(), 0);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
        scheduler.advance(Duration::from_secs(60));
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.clock().now_ms(), 73_000);
    }

    #[test]
    fn repeating_timers_fire_every_period_until_cancelled() {
        let scheduler = MemoryTaskScheduler::default();
        let (count, bump) = counter();
        let id = scheduler.schedule_repeating(Duration::from_secs(5), Rc::new(bump));

        scheduler.advance(Duration::from_secs(16));
        assert_eq!(count.get(), 3);
        assert!(scheduler.is_pending(id));

        scheduler.cancel(id);
        scheduler.advance(Duration::from_secs(60));
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let scheduler = MemoryTaskScheduler::default();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (label, delay) in [("late", 30), ("early", 10), ("middle", 20)] {
            let order = order.clone();
            scheduler.schedule_once(
                Duration::from_millis(delay),
                Box::new(move || order.borrow_mut().push(label)),
            );
        }

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(*order.borrow(), vec!["early", "middle", "late"]);
    }

    #[test]
    fn spawned_tasks_run_when_stalled_pool_is_polled() {
        let scheduler = MemoryTaskScheduler::default();
        let (count, bump) = counter();
        scheduler.spawn(Box::pin(async move { bump() }));
        assert_eq!(count.get(), 0);

        scheduler.run_until_stalled();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn timer_callbacks_may_schedule_more_timers() {
        let scheduler = MemoryTaskScheduler::default();
        let (count, bump) = counter();
        let nested = scheduler.clone();
        scheduler.schedule_once(
            Duration::from_millis(10),
            Box::new(move || {
                nested.schedule_once(Duration::from_millis(10), Box::new(bump));
            }),
        );

        scheduler.advance(Duration::from_millis(25));
        assert_eq!(count.get(), 1);
    }
}
