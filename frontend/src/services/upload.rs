//! Upload sessions.
//!
//! An [`UploadSession`] drives one multipart upload through
//!
//! ```text
//! Idle → Validating → InFlight → Succeeded
//!             │           └────→ Failed (network | timeout | http | bad-response | cancelled)
//!             └────────────────→ Failed (validation)
//! ```
//!
//! Starting a session consumes it and yields an [`UploadTask`]: a stream of
//! [`UploadEvent`]s ending with exactly one `Finished`, plus a
//! [`CancelHandle`]. Validation runs before the transport is touched, so a
//! rejected file never causes a network call.

use std::cell::{Cell, RefCell};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use serde_json::Value;

use super::transport::{AbortHandle, Transport, TransportEvent, UploadRequest};
use crate::config::{FILES_FIELD, FILE_FIELD, UPLOAD_TIMEOUT_MS};
use crate::error::{UploadError, ValidationError};
use crate::types::{FileSource, UploadOutcome};
use crate::validation::ValidationRule;

/// Lifecycle of an upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Validating,
    InFlight,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded | SessionState::Failed)
    }
}

/// Per-upload options.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadOptions {
    /// Extra form fields sent with the file(s)
    pub fields: Vec<(String, String)>,
    /// 0 disables the timeout
    pub timeout_ms: u32,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            timeout_ms: UPLOAD_TIMEOUT_MS,
        }
    }
}

impl UploadOptions {
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Items yielded by an [`UploadTask`].
#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    /// Percentage sent, never decreasing.
    Progress(u8),
    /// Always the last item.
    Finished(UploadOutcome),
}

/// Callback-style consumer of an [`UploadTask`].
pub struct UploadHandlers {
    on_progress: Box<dyn FnMut(u8)>,
    on_success: Box<dyn FnOnce(Value)>,
    on_error: Box<dyn FnOnce(UploadError)>,
}

impl UploadHandlers {
    pub fn new(on_success: impl FnOnce(Value) + 'static, on_error: impl FnOnce(UploadError) + 'static) -> Self {
        Self {
            on_progress: Box::new(|_| {}),
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
        }
    }

    pub fn on_progress(mut self, on_progress: impl FnMut(u8) + 'static) -> Self {
        self.on_progress = Box::new(on_progress);
        self
    }
}

// =============================================================================
// State machine
// =============================================================================

#[derive(Debug)]
struct Machine {
    state: SessionState,
    last_percent: Option<u8>,
    timeout_ms: u32,
}

impl Machine {
    fn new(timeout_ms: u32) -> Self {
        Self {
            state: SessionState::Idle,
            last_percent: None,
            timeout_ms,
        }
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("upload: {:?} → {:?}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: UploadError) -> UploadOutcome {
        self.transition(SessionState::Failed);
        UploadOutcome::Failure(err)
    }

    /// Events after the terminal one are ignored.
    fn on_event(&mut self, event: TransportEvent) -> Option<UploadEvent> {
        if self.state != SessionState::InFlight {
            return None;
        }

        match event {
            TransportEvent::Progress { sent, total } => {
                let total = total.filter(|t| *t > 0)?;
                let percent = (sent as f64 * 100.0 / total as f64).round().min(100.0) as u8;
                if self.last_percent.is_some_and(|last| percent < last) {
                    return None;
                }
                self.last_percent = Some(percent);
                Some(UploadEvent::Progress(percent))
            }
            TransportEvent::Loaded { status, status_text, body } => {
                let outcome = if (200..300).contains(&status) {
                    match serde_json::from_str::<Value>(&body) {
                        Ok(value) => {
                            self.transition(SessionState::Succeeded);
                            UploadOutcome::Success(value)
                        }
                        Err(e) => self.fail(UploadError::BadResponse(e.to_string())),
                    }
                } else {
                    self.fail(UploadError::Http { status, status_text })
                };
                Some(UploadEvent::Finished(outcome))
            }
            TransportEvent::NetworkError => Some(UploadEvent::Finished(self.fail(UploadError::Network))),
            TransportEvent::TimedOut => {
                let timeout_ms = self.timeout_ms;
                Some(UploadEvent::Finished(self.fail(UploadError::Timeout(timeout_ms))))
            }
            TransportEvent::Aborted => Some(UploadEvent::Finished(self.fail(UploadError::Cancelled))),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// One upload, not reusable: `start` consumes it.
pub struct UploadSession<T: Transport> {
    transport: T,
    rule: ValidationRule,
}

impl<T: Transport> UploadSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            rule: ValidationRule::default(),
        }
    }

    /// Override the default rule for this upload.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rule = rule;
        self
    }

    /// Upload a single file under the `file` field.
    pub fn start(self, file: T::File, endpoint: &str, options: UploadOptions) -> UploadTask {
        self.launch(vec![file], FILE_FIELD, endpoint, options)
    }

    /// Upload several files under the repeated `files` field. One invalid
    /// file fails the whole batch.
    pub fn start_batch(self, files: Vec<T::File>, endpoint: &str, options: UploadOptions) -> UploadTask {
        self.launch(files, FILES_FIELD, endpoint, options)
    }

    fn launch(self, files: Vec<T::File>, field: &'static str, endpoint: &str, options: UploadOptions) -> UploadTask {
        let (sender, receiver) = mpsc::unbounded();
        let mut machine = Machine::new(options.timeout_ms);
        let cancellation = Rc::new(Cancellation::default());

        machine.transition(SessionState::Validating);
        let immediate = match self.validate(&files) {
            Err(e) => {
                log::warn!("⚠️ Upload rejected before sending: {}", e);
                Some(machine.fail(e.into()))
            }
            Ok(()) => {
                machine.transition(SessionState::InFlight);
                let request = UploadRequest {
                    url: endpoint.to_string(),
                    field,
                    files,
                    fields: options.fields,
                    timeout_ms: options.timeout_ms,
                };
                match self.transport.send(request, sender) {
                    Ok(handle) => {
                        *cancellation.abort.borrow_mut() = Some(handle);
                        None
                    }
                    Err(e) => {
                        log::error!("❌ Upload could not be sent: {}", e);
                        Some(machine.fail(e))
                    }
                }
            }
        };

        UploadTask {
            machine,
            events: receiver,
            immediate,
            cancellation,
            done: false,
        }
    }

    fn validate(&self, files: &[T::File]) -> Result<(), ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        files.iter().try_for_each(|f| self.rule.check(&f.descriptor()))
    }
}

// =============================================================================
// Task
// =============================================================================

/// Shared between a task and its cancel handles. Holds no event sender, so
/// the task still sees the channel close when the transport drops it.
#[derive(Default)]
struct Cancellation {
    abort: RefCell<Option<AbortHandle>>,
    requested: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

/// Cancels an upload from anywhere. Cancelling a finished upload is a no-op.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Rc<Cancellation>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let handle = self.shared.abort.borrow_mut().take();
        if let Some(handle) = handle {
            log::info!("🛑 Upload cancelled");
            handle.abort();
            // the transport may or may not report the abort itself
            self.shared.requested.set(true);
            let waker = self.shared.waker.borrow_mut().take();
            if let Some(waker) = waker {
                waker.wake();
            }
        }
    }
}

/// A started upload.
pub struct UploadTask {
    machine: Machine,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    immediate: Option<UploadOutcome>,
    cancellation: Rc<Cancellation>,
    done: bool,
}

impl UploadTask {
    pub fn state(&self) -> SessionState {
        self.machine.state
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: self.cancellation.clone(),
        }
    }

    /// Wait for the outcome, discarding progress.
    pub async fn finish(self) -> UploadOutcome {
        self.finish_with_progress(|_| {}).await
    }

    pub async fn finish_with_progress(mut self, mut on_progress: impl FnMut(u8)) -> UploadOutcome {
        while let Some(event) = self.next().await {
            match event {
                UploadEvent::Progress(percent) => on_progress(percent),
                UploadEvent::Finished(outcome) => return outcome,
            }
        }
        // the stream always ends with Finished
        UploadOutcome::Failure(UploadError::Network)
    }

    /// Drive the upload, calling exactly one of `on_success` / `on_error`.
    pub async fn finish_with(self, handlers: UploadHandlers) {
        let UploadHandlers {
            on_progress,
            on_success,
            on_error,
        } = handlers;

        match self.finish_with_progress(on_progress).await {
            UploadOutcome::Success(value) => on_success(value),
            UploadOutcome::Failure(err) => on_error(err),
        }
    }

    fn complete(&mut self) {
        self.done = true;
        // releases the transport without aborting it
        self.cancellation.abort.borrow_mut().take();
    }
}

impl Stream for UploadTask {
    type Item = UploadEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<UploadEvent>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if let Some(outcome) = this.immediate.take() {
            this.complete();
            return Poll::Ready(Some(UploadEvent::Finished(outcome)));
        }

        loop {
            match this.events.poll_next_unpin(cx) {
                Poll::Ready(Some(event)) => {
                    if let Some(item) = this.machine.on_event(event) {
                        if matches!(item, UploadEvent::Finished(_)) {
                            this.complete();
                        }
                        return Poll::Ready(Some(item));
                    }
                }
                Poll::Ready(None) => {
                    let err = if this.cancellation.requested.get() {
                        UploadError::Cancelled
                    } else {
                        log::warn!("Transport dropped without reporting an outcome");
                        UploadError::Network
                    };
                    this.complete();
                    let outcome = this.machine.fail(err);
                    return Poll::Ready(Some(UploadEvent::Finished(outcome)));
                }
                Poll::Pending => {
                    if this.cancellation.requested.get() {
                        if let Some(item) = this.machine.on_event(TransportEvent::Aborted) {
                            this.complete();
                            return Poll::Ready(Some(item));
                        }
                    }
                    *this.cancellation.waker.borrow_mut() = Some(cx.waker().clone());
                    return Poll::Pending;
                }
            }
        }
    }
}
