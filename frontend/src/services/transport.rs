//! HTTP transports for multipart uploads.
//!
//! A [`Transport`] issues one request and reports what happens to it as
//! [`TransportEvent`]s on an unbounded channel. The upload session turns
//! those events into progress and a terminal outcome.
//!
//! [`XhrTransport`] uses `XMLHttpRequest`, the only browser API that reports
//! upload progress. [`FetchTransport`](super::FetchTransport) goes through
//! `gloo-net` and reports no progress.

use futures::channel::mpsc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use crate::error::{js_error_message, UploadError};
use crate::types::FileSource;

/// What the transport observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// Bytes sent so far; `total` is `None` when the size is not computable.
    Progress { sent: u64, total: Option<u64> },
    /// The server answered.
    Loaded { status: u16, status_text: String, body: String },
    NetworkError,
    TimedOut,
    Aborted,
}

pub type EventSink = mpsc::UnboundedSender<TransportEvent>;

/// One multipart request.
#[derive(Clone, Debug)]
pub struct UploadRequest<F> {
    pub url: String,
    /// Form field carrying the files (`file` or `files`)
    pub field: &'static str,
    pub files: Vec<F>,
    /// Extra form fields, appended after the files
    pub fields: Vec<(String, String)>,
    /// 0 disables the timeout
    pub timeout_ms: u32,
}

/// Issues requests on behalf of an upload session.
pub trait Transport {
    type File: FileSource;

    /// Start the request. Every started request must eventually emit exactly
    /// one of `Loaded`, `NetworkError`, `TimedOut` or `Aborted`.
    fn send(&self, request: UploadRequest<Self::File>, events: EventSink) -> Result<AbortHandle, UploadError>;
}

/// Aborts an in-flight request. Dropping it releases the request without
/// aborting.
pub struct AbortHandle(Option<Box<dyn FnOnce()>>);

impl AbortHandle {
    pub fn new(abort: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(abort)))
    }

    pub fn abort(mut self) {
        if let Some(abort) = self.0.take() {
            abort();
        }
    }
}

/// Build the multipart body shared by both browser transports.
pub(crate) fn build_form(request: &UploadRequest<File>) -> Result<FormData, UploadError> {
    let form = FormData::new().map_err(transport_error)?;

    for file in &request.files {
        form.append_with_blob_and_filename(request.field, file, &file.name())
            .map_err(transport_error)?;
    }
    for (key, value) in &request.fields {
        form.append_with_str(key, value).map_err(transport_error)?;
    }

    Ok(form)
}

pub(crate) fn transport_error(err: wasm_bindgen::JsValue) -> UploadError {
    UploadError::Transport(js_error_message(&err))
}

// =============================================================================
// XMLHttpRequest
// =============================================================================

/// `XMLHttpRequest` transport with upload progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct XhrTransport;

/// Keeps the JS callbacks alive for the lifetime of the request.
struct XhrRequest {
    xhr: XmlHttpRequest,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
    _on_timeout: Closure<dyn FnMut()>,
    _on_abort: Closure<dyn FnMut()>,
}

impl Drop for XhrRequest {
    fn drop(&mut self) {
        // detach handlers before the closures are freed
        if let Ok(upload) = self.xhr.upload() {
            upload.set_onprogress(None);
        }
        self.xhr.set_onload(None);
        self.xhr.set_onerror(None);
        self.xhr.set_ontimeout(None);
        self.xhr.set_onabort(None);
    }
}

fn notify_closure(events: &EventSink, event: TransportEvent) -> Closure<dyn FnMut()> {
    let events = events.clone();
    Closure::new(move || {
        let _ = events.unbounded_send(event.clone());
    })
}

impl Transport for XhrTransport {
    type File = File;

    fn send(&self, request: UploadRequest<File>, events: EventSink) -> Result<AbortHandle, UploadError> {
        let form = build_form(&request)?;
        let xhr = XmlHttpRequest::new().map_err(transport_error)?;
        xhr.open("POST", &request.url).map_err(transport_error)?;
        xhr.set_timeout(request.timeout_ms);

        let sink = events.clone();
        let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |e: ProgressEvent| {
            let total = e.length_computable().then(|| e.total() as u64);
            let _ = sink.unbounded_send(TransportEvent::Progress { sent: e.loaded() as u64, total });
        });
        xhr.upload()
            .map_err(transport_error)?
            .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

        let sink = events.clone();
        let loaded = xhr.clone();
        let on_load = Closure::<dyn FnMut()>::new(move || {
            let _ = sink.unbounded_send(TransportEvent::Loaded {
                status: loaded.status().unwrap_or(0),
                status_text: loaded.status_text().unwrap_or_default(),
                body: loaded.response_text().ok().flatten().unwrap_or_default(),
            });
        });
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));

        let on_error = notify_closure(&events, TransportEvent::NetworkError);
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        let on_timeout = notify_closure(&events, TransportEvent::TimedOut);
        xhr.set_ontimeout(Some(on_timeout.as_ref().unchecked_ref()));
        let on_abort = notify_closure(&events, TransportEvent::Aborted);
        xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form)).map_err(transport_error)?;
        log::debug!("📤 POST {} ({} file(s))", request.url, request.files.len());

        let request = XhrRequest {
            xhr,
            _on_progress: on_progress,
            _on_load: on_load,
            _on_error: on_error,
            _on_timeout: on_timeout,
            _on_abort: on_abort,
        };

        Ok(AbortHandle::new(move || {
            if let Err(e) = request.xhr.abort() {
                log::warn!("XHR abort failed: {}", js_error_message(&e));
            }
        }))
    }
}
