//! PDFTool - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading PDF documents to the PDFTool API:
//! drag & drop intake with validation, upload progress, toasts and a
//! persisted light/dark theme.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (theme toggle)                                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  └── UploadPanel                                            │
//! │      ├── drop zone + file input                             │
//! │      ├── FileList                                           │
//! │      └── UploadProgress                                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  NotificationHost, LoadingOverlay                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`validation`] / [`format`] - file checks and byte formatting
//! - [`notifier`] - toast stack with timed dismissal
//! - [`drop_zone`] - drag & drop intake
//! - [`services`] - upload sessions and transports
//! - [`context`] - application context and page lifecycle
//! - [`components`] - UI components (Header, UploadPanel, etc.)

use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;
use web_sys::File;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod types;
pub mod format;
pub mod validation;
pub mod scheduler;
pub mod notifier;
pub mod helpers;
pub mod theme;
pub mod dom;
pub mod drop_zone;
pub mod context;
pub mod bindings;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    FileDescriptor, FileSource,
    // Notifications
    NotificationId, NotificationRecord, Severity,
    // Uploads
    UploadOutcome,
};

// Errors
pub use error::{AppError, AppResult, UploadError, ValidationError};

// Core
pub use context::AppContext;
pub use drop_zone::DropZone;
pub use format::format_size;
pub use helpers::{Debouncer, Throttle};
pub use notifier::{Notifier, ToastSurface};
pub use scheduler::{BrowserScheduler, Scheduler};
pub use theme::{Theme, ThemePreference};
pub use validation::{validate_size, validate_type, ValidationRule};

// Components
pub use components::*;

// Services
pub use services::*;

/// Quiet period before the "N file(s) selected" toast.
const SELECTION_TOAST_DELAY_MS: u32 = 250;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 {} - Starting Leptos App", APP_NAME);

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let toasts = create_rw_signal(Vec::<NotificationRecord>::new());
    let ctx = AppContext::new(FrontendConfig::default(), Rc::new(toasts));
    let selected = create_rw_signal(Vec::<File>::new());

    let announce = {
        let notifier = ctx.notifier().clone();
        Debouncer::new(ctx.scheduler(), SELECTION_TOAST_DELAY_MS, move |count: usize| {
            notifier.success(format!("{} file(s) selected", count));
        })
    };

    // the page elements exist once the view below is mounted
    {
        let ctx = ctx.clone();
        request_animation_frame(move || {
            let on_files = move |files: Vec<File>| {
                selected.update(|list| list.extend(files));
                announce.call(selected.with_untracked(|list| list.len()));
            };
            if let Err(e) = ctx.init(on_files) {
                log::error!("❌ Initialisation failed: {}", e);
            }
        });
    }

    {
        let ctx = ctx.clone();
        on_cleanup(move || ctx.teardown());
    }

    let header_ctx = ctx.clone();
    let main_ctx = ctx.clone();
    let host_notifier = ctx.notifier().clone();
    let overlay_id = ctx.config().elements.loading_overlay.clone();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <Header ctx=header_ctx/>
            <main>
                <Routes>
                    <Route
                        path="/"
                        view=move || view! { <MainContent ctx=main_ctx.clone() selected=selected/> }
                    />
                </Routes>
            </main>
            <Footer/>
        </Router>
        <NotificationHost toasts=toasts notifier=host_notifier/>
        <LoadingOverlay id=overlay_id/>
    }
}

#[component]
fn MainContent(ctx: AppContext, selected: RwSignal<Vec<File>>) -> impl IntoView {
    view! {
        <div class="container">
            <Hero/>
            <UploadPanel ctx=ctx selected=selected/>
        </div>
    }
}
