//! Application context.
//!
//! One [`AppContext`] per page, created by the root component and shared with
//! the rest of the tree through Leptos context. [`AppContext::init`] runs once
//! the view is mounted: it looks the page elements up, applies the stored
//! theme, attaches the drop zone and installs the window-level handlers.
//! [`AppContext::teardown`] undoes all of it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, File, HtmlElement, HtmlInputElement};

use crate::config::{ElementIds, FrontendConfig, APP_NAME, THEME_NOTIFICATION_DURATION_MS};
use crate::dom::{self, Listener};
use crate::drop_zone::{self, DropZone, DropZoneBinding};
use crate::error::{AppError, AppResult, WarnOnErr};
use crate::notifier::{Notifier, ToastSurface};
use crate::scheduler::{BrowserScheduler, Scheduler};
use crate::theme::{LocalStorage, Theme, ThemePreference};
use crate::types::Severity;

const LOADING_TEXT_SELECTOR: &str = ".loading-text";

/// Page elements the context drives directly. Any of them may be absent.
#[derive(Clone, Debug, Default)]
pub struct ElementHandles {
    pub drop_zone: Option<HtmlElement>,
    pub file_input: Option<HtmlInputElement>,
    pub loading_overlay: Option<HtmlElement>,
    pub theme_icon: Option<Element>,
}

impl ElementHandles {
    pub fn lookup(ids: &ElementIds) -> Self {
        let document = gloo_utils::document();
        let by_id = |id: &str| document.get_element_by_id(id);

        let handles = Self {
            drop_zone: by_id(&ids.drop_zone).and_then(|e| e.dyn_into().ok()),
            file_input: by_id(&ids.file_input).and_then(|e| e.dyn_into().ok()),
            loading_overlay: by_id(&ids.loading_overlay).and_then(|e| e.dyn_into().ok()),
            theme_icon: document.query_selector(&ids.theme_icon_selector).ok().flatten(),
        };

        for (name, found) in [
            ("drop zone", handles.drop_zone.is_some()),
            ("file input", handles.file_input.is_some()),
            ("loading overlay", handles.loading_overlay.is_some()),
            ("theme icon", handles.theme_icon.is_some()),
        ] {
            if !found {
                log::warn!("Element not found: {}", name);
            }
        }

        handles
    }
}

#[derive(Default)]
struct Bindings {
    listeners: Vec<Listener>,
    drop_zone: Option<DropZoneBinding>,
}

struct Inner {
    config: FrontendConfig,
    scheduler: Rc<dyn Scheduler>,
    notifier: Notifier,
    theme: ThemePreference,
    elements: RefCell<ElementHandles>,
    zone: RefCell<Option<Rc<DropZone<File>>>>,
    bindings: RefCell<Bindings>,
}

#[derive(Clone)]
pub struct AppContext {
    inner: Rc<Inner>,
}

impl AppContext {
    /// Build the context; toasts are drawn on `surface`.
    pub fn new(config: FrontendConfig, surface: Rc<dyn ToastSurface>) -> Self {
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
        let notifier = Notifier::new(scheduler.clone(), surface, config.notification_duration_ms);
        let theme = ThemePreference::load(Rc::new(LocalStorage));

        Self {
            inner: Rc::new(Inner {
                config,
                scheduler,
                notifier,
                theme,
                elements: RefCell::default(),
                zone: RefCell::default(),
                bindings: RefCell::default(),
            }),
        }
    }

    /// Wire the mounted page. Accepted files, dropped or picked, go to `on_files`.
    pub fn init(&self, on_files: impl Fn(Vec<File>) + 'static) -> AppResult<()> {
        let elements = ElementHandles::lookup(&self.inner.config.elements);
        *self.inner.elements.borrow_mut() = elements.clone();

        self.apply_theme(self.inner.theme.current());

        let zone = Rc::new(DropZone::new(
            self.inner.config.rule.clone(),
            self.inner.notifier.clone(),
            on_files,
        ));
        let zone_binding = drop_zone::attach(elements.drop_zone, zone.clone());
        *self.inner.zone.borrow_mut() = Some(zone);

        let mut listeners = dom::install_error_handlers(&self.inner.notifier)?;
        let weak = Rc::downgrade(&self.inner);
        listeners.push(dom::install_shortcuts(move || {
            if let Some(inner) = weak.upgrade() {
                AppContext { inner }.go_home();
            }
        })?);

        *self.inner.bindings.borrow_mut() = Bindings {
            listeners,
            drop_zone: zone_binding,
        };

        log::info!("🚀 {} ready (theme: {})", APP_NAME, self.inner.theme.current());
        Ok(())
    }

    /// Remove every listener installed by [`init`](Self::init) and clear the toasts.
    pub fn teardown(&self) {
        let bindings = std::mem::take(&mut *self.inner.bindings.borrow_mut());
        drop(bindings);
        self.inner.zone.borrow_mut().take();
        self.inner.notifier.dismiss_all();
        self.hide_loading();
        log::info!("👋 {} torn down", APP_NAME);
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.inner.config
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.inner.scheduler.clone()
    }

    pub fn theme(&self) -> Theme {
        self.inner.theme.current()
    }

    /// Files picked through the file input; same path as a drop.
    pub fn accept_files(&self, files: Vec<File>) -> usize {
        let zone = self.inner.zone.borrow().clone();
        match zone {
            Some(zone) => zone.accept(files),
            None => {
                log::warn!("File selection ignored, context not initialised");
                0
            }
        }
    }

    /// Reset the file input so picking the same file again fires `change`.
    pub fn reset_file_input(&self) {
        if let Some(input) = &self.inner.elements.borrow().file_input {
            input.set_value("");
        }
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = match self.inner.theme.toggle() {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("Theme preference not saved: {}", e);
                self.inner.theme.current()
            }
        };

        self.apply_theme(theme);
        self.inner.notifier.notify(
            format!("Switched to {} theme", theme),
            Severity::Info,
            THEME_NOTIFICATION_DURATION_MS,
        );
        theme
    }

    fn apply_theme(&self, theme: Theme) {
        dom::apply_theme(theme);
        if let Some(icon) = &self.inner.elements.borrow().theme_icon {
            icon.set_text_content(Some(theme.icon()));
        }
    }

    pub fn show_loading(&self, message: &str) {
        let elements = self.inner.elements.borrow();
        let Some(overlay) = &elements.loading_overlay else { return };

        if let Ok(Some(text)) = overlay.query_selector(LOADING_TEXT_SELECTOR) {
            text.set_text_content(Some(message));
        }
        set_display(overlay, "flex");
    }

    pub fn hide_loading(&self) {
        if let Some(overlay) = &self.inner.elements.borrow().loading_overlay {
            set_display(overlay, "none");
        }
    }

    /// Navigate to the home page behind the loading overlay.
    pub fn go_home(&self) {
        self.show_loading("Loading...");
        dom::navigate("/");
    }
}

fn set_display(overlay: &HtmlElement, value: &str) {
    overlay
        .style()
        .set_property("display", value)
        .map_err(AppError::dom)
        .warn_on_err("Loading overlay display");
}
