//! Timer abstraction.
//!
//! Toast expiry, debounce and throttle all need "run this later". In the
//! browser that is `setTimeout` through `gloo-timers`; tests drive a manual
//! clock instead.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Runs tasks after a delay on the current thread.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask;
}

/// Host side of a scheduled task.
pub trait PendingTimer {
    /// Prevent the task from running.
    fn cancel(self: Box<Self>);
    /// Let the task run without keeping a handle.
    fn detach(self: Box<Self>);
}

/// Handle to a task that has not run yet. Dropping it cancels the task.
#[must_use = "dropping a ScheduledTask cancels it"]
pub struct ScheduledTask(Option<Box<dyn PendingTimer>>);

impl ScheduledTask {
    pub fn new(timer: impl PendingTimer + 'static) -> Self {
        Self(Some(Box::new(timer)))
    }

    pub fn cancel(mut self) {
        if let Some(timer) = self.0.take() {
            timer.cancel();
        }
    }

    pub fn detach(mut self) {
        if let Some(timer) = self.0.take() {
            timer.detach();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(timer) = self.0.take() {
            timer.cancel();
        }
    }
}

/// `setTimeout`-backed scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask {
        ScheduledTask::new(OwnedTimer::new(task, |callback| Timeout::new(delay_ms, callback)))
    }
}

/// A host timer that can outlive its handle. Dropping `T` clears the timer
/// and frees its callback; a detached timer is parked in `slot` and dropped
/// by its own callback once it has run.
struct OwnedTimer<T: 'static> {
    timer: T,
    slot: Rc<RefCell<Option<T>>>,
}

impl<T: 'static> OwnedTimer<T> {
    fn new(task: Box<dyn FnOnce()>, start: impl FnOnce(Box<dyn FnOnce()>) -> T) -> Self {
        let slot = Rc::new(RefCell::new(None));
        let owner = Rc::clone(&slot);
        let timer = start(Box::new(move || {
            let parked = owner.borrow_mut().take();
            task();
            drop(parked);
        }));

        Self { timer, slot }
    }
}

impl<T: 'static> PendingTimer for OwnedTimer<T> {
    fn cancel(self: Box<Self>) {
        drop(self.timer);
    }

    fn detach(self: Box<Self>) {
        let OwnedTimer { timer, slot } = *self;
        *slot.borrow_mut() = Some(timer);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Stands in for a host timer: keeps the callback, counts drops.
    struct FakeTimer {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for FakeTimer {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    type Callback = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

    fn start(ran: Rc<Cell<bool>>) -> (ScheduledTask, Callback, Rc<Cell<usize>>) {
        let callback: Callback = Rc::default();
        let drops = Rc::new(Cell::new(0));
        let (cb, d) = (callback.clone(), drops.clone());
        let timer = OwnedTimer::new(Box::new(move || ran.set(true)), move |f| {
            *cb.borrow_mut() = Some(f);
            FakeTimer { drops: d }
        });
        (ScheduledTask::new(timer), callback, drops)
    }

    fn fire(callback: &Callback) {
        let f = callback.borrow_mut().take();
        if let Some(f) = f {
            f();
        }
    }

    #[test]
    fn test_detached_timer_frees_itself_after_firing() {
        let ran = Rc::new(Cell::new(false));
        let (task, callback, drops) = start(ran.clone());

        task.detach();
        assert_eq!(drops.get(), 0);

        fire(&callback);
        assert!(ran.get());
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_dropping_a_fired_handle_frees_the_timer() {
        let ran = Rc::new(Cell::new(false));
        let (task, callback, drops) = start(ran.clone());

        fire(&callback);
        assert!(ran.get());
        assert_eq!(drops.get(), 0);

        drop(task);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_cancel_drops_the_timer() {
        let ran = Rc::new(Cell::new(false));
        let (task, _callback, drops) = start(ran.clone());

        task.cancel();
        assert_eq!(drops.get(), 1);
        assert!(!ran.get());
    }
}
