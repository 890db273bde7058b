//! `fetch` transport built on `gloo-net`.
//!
//! Fetch cannot observe upload progress, so this transport never emits
//! [`TransportEvent::Progress`]. Use it where progress is irrelevant (small
//! files) or `XMLHttpRequest` is unavailable.

use std::future::Future;

use futures::FutureExt;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AbortController, File};

use super::transport::{build_form, transport_error, AbortHandle, EventSink, Transport, TransportEvent, UploadRequest};
use crate::error::UploadError;

/// Longest delay `setTimeout` accepts; stands in for "no timeout".
const MAX_TIMER_MS: u32 = i32::MAX as u32;

#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    type File = File;

    fn send(&self, request: UploadRequest<File>, events: EventSink) -> Result<AbortHandle, UploadError> {
        let form = build_form(&request)?;
        let controller = AbortController::new().map_err(transport_error)?;
        let signal = controller.signal();

        let http_request = Request::post(&request.url)
            .abort_signal(Some(&signal))
            .body(form)
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let timeout_ms = match request.timeout_ms {
            0 => MAX_TIMER_MS,
            ms => ms,
        };
        let timeout_controller = controller.clone();
        let url = request.url.clone();

        spawn_local(async move {
            // the timer covers the body read as well as the headers
            let exchange = async {
                let resp = http_request.send().await?;
                let status = resp.status();
                let status_text = resp.status_text();
                let body = resp.text().await?;
                Ok::<_, gloo_net::Error>(TransportEvent::Loaded { status, status_text, body })
            };

            let event = match race_timeout(exchange, TimeoutFuture::new(timeout_ms)).await {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    log::warn!("fetch {} failed: {}", url, e);
                    TransportEvent::NetworkError
                }
                None => {
                    timeout_controller.abort();
                    TransportEvent::TimedOut
                }
            };

            let _ = events.unbounded_send(event);
        });

        Ok(AbortHandle::new(move || controller.abort()))
    }
}

/// `None` when `timer` finishes before `work`.
async fn race_timeout<F, T>(work: F, timer: T) -> Option<F::Output>
where
    F: Future,
    T: Future<Output = ()>,
{
    let mut work = Box::pin(work.fuse());
    let mut timer = Box::pin(timer.fuse());

    futures::select! {
        output = work => Some(output),
        _ = timer => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{pending, ready};

    #[test]
    fn test_work_finishing_first_wins() {
        assert_eq!(block_on(race_timeout(ready(7), pending())), Some(7));
    }

    #[test]
    fn test_timer_finishing_first_gives_none() {
        assert_eq!(block_on(race_timeout(pending::<u8>(), ready(()))), None);
    }

    #[test]
    fn test_timer_still_applies_after_first_step() {
        // headers arrive, the body never does
        let work = async {
            ready(()).await;
            pending::<()>().await;
            "body"
        };
        assert_eq!(block_on(race_timeout(work, ready(()))), None);
    }
}
