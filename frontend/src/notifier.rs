//! Transient on-screen notifications (toasts).
//!
//! Notifications stack: showing a new toast never removes the ones already on
//! screen. Each toast with a non-zero duration is removed by a timer; a zero
//! duration keeps it until [`Notifier::dismiss`] is called. Dismissal is
//! idempotent and cancels the pending timer.
//!
//! Rendering is delegated to a [`ToastSurface`]; the Leptos surface lives in
//! [`crate::components::NotificationHost`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::scheduler::{ScheduledTask, Scheduler};
use crate::types::{NotificationId, NotificationRecord, Severity};

/// Where toasts are drawn.
pub trait ToastSurface {
    fn show(&self, record: &NotificationRecord);
    fn remove(&self, id: NotificationId);
}

struct Entry {
    record: NotificationRecord,
    timer: Option<ScheduledTask>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    entries: Vec<Entry>,
}

struct Shared {
    state: RefCell<State>,
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn ToastSurface>,
    default_duration_ms: u32,
}

/// Cheap to clone; all clones share the same toast stack.
#[derive(Clone)]
pub struct Notifier {
    shared: Rc<Shared>,
}

impl Notifier {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        surface: Rc<dyn ToastSurface>,
        default_duration_ms: u32,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(State::default()),
                scheduler,
                surface,
                default_duration_ms,
            }),
        }
    }

    /// Show a toast; `duration_ms == 0` makes it sticky.
    pub fn notify(&self, message: impl Into<String>, severity: Severity, duration_ms: u32) -> NotificationId {
        let record = {
            let mut state = self.shared.state.borrow_mut();
            let id = NotificationId(state.next_id);
            state.next_id += 1;
            NotificationRecord {
                id,
                message: message.into(),
                severity,
                duration_ms,
            }
        };
        let id = record.id;

        match severity {
            Severity::Error => log::error!("{} {}", severity.icon(), record.message),
            Severity::Warning => log::warn!("{} {}", severity.icon(), record.message),
            Severity::Success | Severity::Info => log::info!("{} {}", severity.icon(), record.message),
        }

        self.shared.surface.show(&record);

        let timer = (duration_ms > 0).then(|| {
            let weak = Rc::downgrade(&self.shared);
            self.shared.scheduler.schedule(
                duration_ms,
                Box::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        Notifier { shared }.expire(id);
                    }
                }),
            )
        });

        self.shared.state.borrow_mut().entries.push(Entry { record, timer });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Success, self.shared.default_duration_ms)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Error, self.shared.default_duration_ms)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Warning, self.shared.default_duration_ms)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Info, self.shared.default_duration_ms)
    }

    /// Remove a toast. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let Some(entry) = self.take(id) else {
            return false;
        };
        self.shared.surface.remove(id);
        // dropping the timer cancels it
        drop(entry);
        true
    }

    pub fn dismiss_all(&self) {
        let entries = std::mem::take(&mut self.shared.state.borrow_mut().entries);
        for entry in entries {
            self.shared.surface.remove(entry.record.id);
        }
    }

    /// Toasts currently on screen, oldest first.
    pub fn active(&self) -> Vec<NotificationRecord> {
        self.shared
            .state
            .borrow()
            .entries
            .iter()
            .map(|e| e.record.clone())
            .collect()
    }

    fn expire(&self, id: NotificationId) {
        // dropping the entry frees the timer that is running right now
        if let Some(entry) = self.take(id) {
            drop(entry);
            self.shared.surface.remove(id);
        }
    }

    fn take(&self, id: NotificationId) -> Option<Entry> {
        let mut state = self.shared.state.borrow_mut();
        let position = state.entries.iter().position(|e| e.record.id == id)?;
        Some(state.entries.remove(position))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scheduler::manual::ManualScheduler;

    /// Records surface calls as `show:<id>` / `remove:<id>`.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub events: RefCell<Vec<String>>,
        pub shown: RefCell<Vec<NotificationRecord>>,
    }

    impl ToastSurface for RecordingSurface {
        fn show(&self, record: &NotificationRecord) {
            self.events.borrow_mut().push(format!("show:{}", record.id.0));
            self.shown.borrow_mut().push(record.clone());
        }

        fn remove(&self, id: NotificationId) {
            self.events.borrow_mut().push(format!("remove:{}", id.0));
        }
    }

    pub(crate) fn notifier() -> (Notifier, ManualScheduler, Rc<RecordingSurface>) {
        let scheduler = ManualScheduler::new();
        let surface = Rc::new(RecordingSurface::default());
        let notifier = Notifier::new(Rc::new(scheduler.clone()), surface.clone(), 5_000);
        (notifier, scheduler, surface)
    }

    #[test]
    fn test_sticky_notification_never_expires() {
        let (notifier, scheduler, surface) = notifier();

        notifier.notify("pinned", Severity::Info, 0);
        scheduler.advance(24 * 60 * 60 * 1000);

        assert_eq!(notifier.active().len(), 1);
        assert_eq!(*surface.events.borrow(), ["show:0"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_timed_notification_expires_exactly() {
        let (notifier, scheduler, surface) = notifier();

        notifier.notify("saved", Severity::Success, 2_000);
        scheduler.advance(1_999);
        assert_eq!(notifier.active().len(), 1);

        scheduler.advance(1);
        assert!(notifier.active().is_empty());
        assert_eq!(*surface.events.borrow(), ["show:0", "remove:0"]);
    }

    #[test]
    fn test_manual_dismiss_is_idempotent_and_cancels_timer() {
        let (notifier, scheduler, surface) = notifier();

        let id = notifier.error("boom");
        assert_eq!(scheduler.pending(), 1);

        assert!(notifier.dismiss(id));
        assert!(!notifier.dismiss(id));
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(10_000);
        assert_eq!(*surface.events.borrow(), ["show:0", "remove:0"]);
    }

    #[test]
    fn test_notifications_stack() {
        let (notifier, scheduler, _) = notifier();

        notifier.notify("first", Severity::Info, 1_000);
        notifier.notify("second", Severity::Warning, 3_000);
        let messages: Vec<_> = notifier.active().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, ["first", "second"]);

        scheduler.advance(1_000);
        let messages: Vec<_> = notifier.active().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, ["second"]);
    }

    #[test]
    fn test_dismiss_all() {
        let (notifier, scheduler, surface) = notifier();

        notifier.info("a");
        notifier.notify("b", Severity::Info, 0);
        notifier.dismiss_all();

        assert!(notifier.active().is_empty());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(surface.events.borrow().len(), 4);
    }

    #[test]
    fn test_default_duration_applies_to_shorthands() {
        let (notifier, _, surface) = notifier();

        notifier.warning("careful");

        let shown = surface.shown.borrow();
        assert_eq!(shown[0].duration_ms, 5_000);
        assert_eq!(shown[0].severity, Severity::Warning);
    }
}
