//! Rate-limiting helpers for event handlers.
//!
//! - [`Debouncer`] runs the most recent call once the caller has been quiet
//!   for `wait_ms`.
//! - [`Throttle`] runs the first call and drops the following ones until
//!   `limit_ms` has elapsed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scheduler::{ScheduledTask, Scheduler};

struct DebounceShared<A> {
    scheduler: Rc<dyn Scheduler>,
    wait_ms: u32,
    func: Box<dyn Fn(A)>,
    pending: RefCell<Option<ScheduledTask>>,
}

/// Delays calls until input settles.
pub struct Debouncer<A> {
    shared: Rc<DebounceShared<A>>,
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self { shared: self.shared.clone() }
    }
}

impl<A: 'static> Debouncer<A> {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait_ms: u32, func: impl Fn(A) + 'static) -> Self {
        Self {
            shared: Rc::new(DebounceShared {
                scheduler,
                wait_ms,
                func: Box::new(func),
                pending: RefCell::new(None),
            }),
        }
    }

    /// Restart the wait with `arg` as the value to deliver.
    pub fn call(&self, arg: A) {
        let weak = Rc::downgrade(&self.shared);
        let task = self.shared.scheduler.schedule(
            self.shared.wait_ms,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else { return };
                let fired = shared.pending.borrow_mut().take();
                drop(fired);
                (shared.func)(arg);
            }),
        );
        // the replaced task is cancelled on drop
        let previous = self.shared.pending.replace(Some(task));
        drop(previous);
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        let pending = self.shared.pending.borrow_mut().take();
        drop(pending);
    }

    pub fn is_pending(&self) -> bool {
        self.shared.pending.borrow().is_some()
    }
}

struct ThrottleShared<A> {
    scheduler: Rc<dyn Scheduler>,
    limit_ms: u32,
    func: Box<dyn Fn(A)>,
    cooldown: RefCell<Option<ScheduledTask>>,
}

/// Runs at most once per window.
pub struct Throttle<A> {
    shared: Rc<ThrottleShared<A>>,
}

impl<A> Clone for Throttle<A> {
    fn clone(&self) -> Self {
        Self { shared: self.shared.clone() }
    }
}

impl<A: 'static> Throttle<A> {
    pub fn new(scheduler: Rc<dyn Scheduler>, limit_ms: u32, func: impl Fn(A) + 'static) -> Self {
        Self {
            shared: Rc::new(ThrottleShared {
                scheduler,
                limit_ms,
                func: Box::new(func),
                cooldown: RefCell::new(None),
            }),
        }
    }

    /// Returns `false` when the call was dropped.
    pub fn call(&self, arg: A) -> bool {
        if self.shared.cooldown.borrow().is_some() {
            return false;
        }

        let weak = Rc::downgrade(&self.shared);
        let cooldown = self.shared.scheduler.schedule(
            self.shared.limit_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    let done = shared.cooldown.borrow_mut().take();
                    drop(done);
                }
            }),
        );
        *self.shared.cooldown.borrow_mut() = Some(cooldown);

        (self.shared.func)(arg);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::manual::ManualScheduler;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |v| sink.borrow_mut().push(v))
    }

    #[test]
    fn test_debounce_delivers_last_value_after_quiet_period() {
        let scheduler = ManualScheduler::new();
        let (calls, func) = recorder();
        let debounced = Debouncer::new(Rc::new(scheduler.clone()), 300, func);

        debounced.call(1);
        scheduler.advance(200);
        debounced.call(2);
        scheduler.advance(200);
        debounced.call(3);
        assert!(calls.borrow().is_empty());

        scheduler.advance(300);
        assert_eq!(*calls.borrow(), [3]);
        assert!(!debounced.is_pending());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_debounce_cancel() {
        let scheduler = ManualScheduler::new();
        let (calls, func) = recorder();
        let debounced = Debouncer::new(Rc::new(scheduler.clone()), 100, func);

        debounced.call(7);
        debounced.cancel();
        scheduler.advance(1_000);

        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_throttle_drops_calls_inside_window() {
        let scheduler = ManualScheduler::new();
        let (calls, func) = recorder();
        let throttled = Throttle::new(Rc::new(scheduler.clone()), 1_000, func);

        assert!(throttled.call(1));
        assert!(!throttled.call(2));
        scheduler.advance(999);
        assert!(!throttled.call(3));
        scheduler.advance(1);
        assert!(throttled.call(4));

        assert_eq!(*calls.borrow(), [1, 4]);
    }

    #[test]
    fn test_throttle_window_leaves_no_timer_behind() {
        let scheduler = ManualScheduler::new();
        let (calls, func) = recorder();
        let throttled = Throttle::new(Rc::new(scheduler.clone()), 500, func);

        assert!(throttled.call(1));
        assert_eq!(scheduler.pending(), 1);
        scheduler.advance(500);
        assert_eq!(scheduler.pending(), 0);

        assert!(throttled.call(2));
        scheduler.advance(500);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(*calls.borrow(), [1, 2]);
    }
}
