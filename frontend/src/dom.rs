//! Page-level DOM helpers: event listener guards, global error handlers,
//! keyboard shortcuts, theme attribute and file downloads.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, ErrorEvent, Event, EventTarget, HtmlAnchorElement, KeyboardEvent, PromiseRejectionEvent, Url};

use crate::error::{js_error_message, AppError, AppResult, WarnOnErr};
use crate::notifier::Notifier;
use crate::theme::Theme;

pub const SCRIPT_ERROR_MESSAGE: &str = "Something went wrong, please refresh the page and retry";
pub const REJECTION_MESSAGE: &str = "A request failed, please check your network connection";

/// An `addEventListener` registration, removed on drop.
pub struct Listener {
    target: EventTarget,
    name: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(target: &EventTarget, name: &'static str, callback: impl FnMut(Event) + 'static) -> AppResult<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target
            .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            .map_err(AppError::dom)?;

        Ok(Self {
            target: target.clone(),
            name,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.name, self.callback.as_ref().unchecked_ref())
            .map_err(AppError::dom)
            .warn_on_err("Removing the listener");
    }
}

/// Catch uncaught errors and unhandled rejections, log them and show a
/// generic toast instead of leaving the page silently broken.
pub fn install_error_handlers(notifier: &Notifier) -> AppResult<Vec<Listener>> {
    let window: EventTarget = gloo_utils::window().into();

    let on_error = {
        let notifier = notifier.clone();
        Listener::new(&window, "error", move |e: Event| {
            match e.dyn_ref::<ErrorEvent>() {
                Some(err) => log::error!("Uncaught error: {} ({}:{})", err.message(), err.filename(), err.lineno()),
                None => log::error!("Uncaught error event: {}", e.type_()),
            }
            notifier.error(SCRIPT_ERROR_MESSAGE);
        })?
    };

    let on_rejection = {
        let notifier = notifier.clone();
        Listener::new(&window, "unhandledrejection", move |e: Event| {
            let reason = e
                .dyn_ref::<PromiseRejectionEvent>()
                .map(|r| js_error_message(&r.reason()))
                .unwrap_or_default();
            log::error!("Unhandled promise rejection: {}", reason);
            notifier.error(REJECTION_MESSAGE);
        })?
    };

    Ok(vec![on_error, on_rejection])
}

/// `Escape` anywhere but the home page calls `on_escape`.
pub fn install_shortcuts(on_escape: impl Fn() + 'static) -> AppResult<Listener> {
    let document: EventTarget = gloo_utils::document().into();

    Listener::new(&document, "keydown", move |e: Event| {
        let Some(key) = e.dyn_ref::<KeyboardEvent>() else { return };
        if key.key() == "Escape" && current_path().as_deref() != Some("/") {
            on_escape();
        }
    })
}

pub fn current_path() -> Option<String> {
    gloo_utils::window().location().pathname().ok()
}

pub fn navigate(href: &str) {
    if let Err(e) = gloo_utils::window().location().set_href(href) {
        log::warn!("Navigation to {} failed: {}", href, js_error_message(&e));
    }
}

/// Set `data-theme` on `<html>`.
pub fn apply_theme(theme: Theme) {
    if let Err(e) = gloo_utils::document_element().set_attribute("data-theme", theme.as_str()) {
        log::warn!("Failed to apply theme: {}", js_error_message(&e));
    }
}

/// Save `blob` as `filename` through a temporary object URL.
pub fn download_blob(blob: &Blob, filename: &str) -> AppResult<()> {
    let document = gloo_utils::document();
    let body = document
        .body()
        .ok_or_else(|| AppError::MissingElement("body".into()))?;

    let url = Url::create_object_url_with_blob(blob).map_err(AppError::dom)?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(AppError::dom)?
        .unchecked_into();
    anchor.set_href(&url);
    anchor.set_download(filename);

    body.append_child(&anchor).map_err(AppError::dom)?;
    anchor.click();
    Url::revoke_object_url(&url)
        .map_err(AppError::dom)
        .warn_on_err("Revoking the download URL");
    body.remove_child(&anchor).map_err(AppError::dom)?;

    log::info!("💾 Downloaded {}", filename);
    Ok(())
}

/// Save a JSON value as a pretty-printed file.
pub fn download_json(value: &serde_json::Value, filename: &str) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AppError::Dom(e.to_string()))?;
    let parts = js_sys::Array::of1(&JsValue::from_str(&text));
    let blob = Blob::new_with_str_sequence(&parts).map_err(AppError::dom)?;
    download_blob(&blob, filename)
}
