//! Drag & drop file intake.
//!
//! [`DropZone`] holds the behaviour: highlight while a drag hovers the
//! region, validate dropped files, warn about each rejected one and hand the
//! accepted ones to the callback in a single call. [`attach`] wires it to a
//! DOM element and to the document body, so a drop that misses the region
//! does not make the browser navigate to the file.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, EventTarget, File, FileList, HtmlElement};

use crate::dom::Listener;
use crate::error::{AppError, AppResult, WarnOnErr};
use crate::notifier::Notifier;
use crate::types::FileSource;
use crate::validation::ValidationRule;

/// CSS class applied while a drag is over the region.
pub const HIGHLIGHT_CLASS: &str = "dragover";

const DRAG_EVENTS: [&str; 4] = ["dragenter", "dragover", "dragleave", "drop"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
}

impl DragPhase {
    fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "dragenter" => Some(DragPhase::Enter),
            "dragover" => Some(DragPhase::Over),
            "dragleave" => Some(DragPhase::Leave),
            _ => None,
        }
    }
}

pub struct DropZone<F: FileSource> {
    rule: ValidationRule,
    notifier: Notifier,
    on_files_accepted: Box<dyn Fn(Vec<F>)>,
    highlighted: Cell<bool>,
}

impl<F: FileSource> DropZone<F> {
    pub fn new(rule: ValidationRule, notifier: Notifier, on_files_accepted: impl Fn(Vec<F>) + 'static) -> Self {
        Self {
            rule,
            notifier,
            on_files_accepted: Box::new(on_files_accepted),
            highlighted: Cell::new(false),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted.get()
    }

    /// Returns the highlight state after the event.
    pub fn on_drag(&self, phase: DragPhase) -> bool {
        let highlighted = !matches!(phase, DragPhase::Leave);
        self.highlighted.set(highlighted);
        highlighted
    }

    /// Clear the highlight and take the dropped files.
    pub fn on_drop(&self, files: Vec<F>) -> usize {
        self.highlighted.set(false);
        self.accept(files)
    }

    /// Validate `files`, warn per rejection, forward the rest. Returns the
    /// number of accepted files; the callback is skipped when it is zero.
    pub fn accept(&self, files: Vec<F>) -> usize {
        let (accepted, rejected) = self.rule.partition(files);

        for err in &rejected {
            self.notifier.warning(err.to_string());
        }

        let count = accepted.len();
        if count > 0 {
            log::info!("📥 {} file(s) accepted, {} rejected", count, rejected.len());
            (self.on_files_accepted)(accepted);
        }
        count
    }
}

// =============================================================================
// DOM binding
// =============================================================================

/// Live event listeners; dropping it detaches them.
pub struct DropZoneBinding {
    _listeners: Vec<Listener>,
}

/// Wire `zone` to `region`. A missing region makes this a no-op.
pub fn attach(region: Option<HtmlElement>, zone: Rc<DropZone<File>>) -> Option<DropZoneBinding> {
    let Some(region) = region else {
        log::warn!("Drop zone element not found, drag & drop disabled");
        return None;
    };

    let mut listeners = Vec::new();
    let target: EventTarget = region.clone().into();

    for name in DRAG_EVENTS {
        let zone = zone.clone();
        let element = region.clone();
        let listener = Listener::new(&target, name, move |e: Event| {
            e.prevent_default();
            e.stop_propagation();

            let highlighted = match DragPhase::from_event_name(name) {
                Some(phase) => zone.on_drag(phase),
                None => {
                    zone.on_drop(dropped_files(&e));
                    false
                }
            };
            element
                .class_list()
                .toggle_with_force(HIGHLIGHT_CLASS, highlighted)
                .map_err(AppError::dom)
                .warn_on_err("Drop zone highlight");
        });
        keep(&mut listeners, name, listener);
    }

    // stop the browser from opening files dropped next to the region
    if let Some(body) = gloo_utils::document().body() {
        let body: EventTarget = body.into();
        for name in DRAG_EVENTS {
            let listener = Listener::new(&body, name, |e: Event| {
                e.prevent_default();
                e.stop_propagation();
            });
            keep(&mut listeners, name, listener);
        }
    }

    Some(DropZoneBinding { _listeners: listeners })
}

fn keep(listeners: &mut Vec<Listener>, name: &str, listener: AppResult<Listener>) {
    match listener {
        Ok(listener) => listeners.push(listener),
        Err(e) => log::warn!("Failed to listen for {}: {}", name, e),
    }
}

fn dropped_files(event: &Event) -> Vec<File> {
    event
        .dyn_ref::<DragEvent>()
        .and_then(|e| e.data_transfer())
        .and_then(|dt| dt.files())
        .map(|list| file_list_to_vec(&list))
        .unwrap_or_default()
}

/// Copy a `FileList` into a `Vec`.
pub fn file_list_to_vec(list: &FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::tests::notifier;
    use crate::types::{FileDescriptor, Severity};
    use std::cell::RefCell;

    type Calls = Rc<RefCell<Vec<Vec<String>>>>;

    fn zone(notifier: Notifier) -> (DropZone<FileDescriptor>, Calls) {
        let calls: Calls = Rc::default();
        let sink = calls.clone();
        let zone = DropZone::new(ValidationRule::new([".pdf"], 1_000), notifier, move |files: Vec<FileDescriptor>| {
            sink.borrow_mut().push(files.into_iter().map(|f| f.name).collect());
        });
        (zone, calls)
    }

    #[test]
    fn test_mixed_drop_forwards_only_valid_files_once() {
        let (notifier, _, surface) = notifier();
        let (zone, calls) = zone(notifier);

        let accepted = zone.on_drop(vec![FileDescriptor::new("good.pdf", 10), FileDescriptor::new("bad.txt", 10)]);

        assert_eq!(accepted, 1);
        assert_eq!(*calls.borrow(), vec![vec!["good.pdf".to_string()]]);

        let shown = surface.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].severity, Severity::Warning);
        assert!(shown[0].message.contains("bad.txt"));
    }

    #[test]
    fn test_invalid_only_drop_never_calls_back() {
        let (notifier, _, surface) = notifier();
        let (zone, calls) = zone(notifier);

        zone.on_drop(vec![FileDescriptor::new("bad.txt", 10), FileDescriptor::new("huge.pdf", 5_000)]);

        assert!(calls.borrow().is_empty());
        let shown = surface.shown.borrow();
        assert_eq!(shown.len(), 2);
        assert!(shown[1].message.contains("huge.pdf"));
        assert!(shown[1].message.contains("1000 Bytes"));
    }

    #[test]
    fn test_empty_drop_is_silent() {
        let (notifier, _, surface) = notifier();
        let (zone, calls) = zone(notifier);

        assert_eq!(zone.on_drop(Vec::new()), 0);
        assert!(calls.borrow().is_empty());
        assert!(surface.shown.borrow().is_empty());
    }

    #[test]
    fn test_highlight_follows_drag() {
        let (notifier, _, _) = notifier();
        let (zone, _) = zone(notifier);

        assert!(zone.on_drag(DragPhase::Enter));
        assert!(zone.on_drag(DragPhase::Over));
        assert!(!zone.on_drag(DragPhase::Leave));

        zone.on_drag(DragPhase::Enter);
        zone.on_drop(vec![FileDescriptor::new("a.pdf", 1)]);
        assert!(!zone.is_highlighted());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(DragPhase::from_event_name("dragover"), Some(DragPhase::Over));
        assert_eq!(DragPhase::from_event_name("drop"), None);
    }
}
