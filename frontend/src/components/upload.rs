//! PDF upload panel with drag & drop support.
//!
//! The drop zone listeners are attached by [`AppContext::init`]; this
//! component renders the elements, the endpoint picker and the selected files,
//! and drives one [`UploadSession`] per upload.

use std::collections::HashMap;

use leptos::*;
use serde_json::Value;
use web_sys::{Event, File, HtmlInputElement};

use crate::components::{FileList, UploadEntry, UploadProgress, UploadStatus};
use crate::config::{Endpoint, TransportKind};
use crate::context::AppContext;
use crate::dom::download_json;
use crate::drop_zone::file_list_to_vec;
use crate::error::ValidationError;
use crate::format::format_size;
use crate::services::{
    CancelHandle, FetchTransport, Transport, UploadOptions, UploadSession, UploadTask, XhrTransport,
};
use crate::types::UploadOutcome;
use crate::validation::ValidationRule;

/// Finished progress widgets stay on screen this long.
const FINISHED_WIDGET_MS: u32 = 3_000;

const RESULT_FILE_NAME: &str = "pdftool-result.json";

#[component]
pub fn UploadPanel(ctx: AppContext, selected: RwSignal<Vec<File>>) -> impl IntoView {
    let (endpoint, set_endpoint) = create_signal(Endpoint::Merge);
    let uploads = create_rw_signal(Vec::<UploadEntry>::new());
    let last_result = create_rw_signal(None::<Value>);
    let cancels = store_value(HashMap::<u64, CancelHandle>::new());
    let next_id = store_value(0u64);

    let ids = ctx.config().elements.clone();
    let accept = ctx.config().rule.allowed_extensions.join(",");

    let on_file_change = {
        let ctx = ctx.clone();
        move |ev: Event| {
            let input: HtmlInputElement = event_target(&ev);
            if let Some(files) = input.files() {
                ctx.accept_files(file_list_to_vec(&files));
            }
            ctx.reset_file_input();
        }
    };

    let file_input_ref = create_node_ref::<html::Input>();
    let trigger_file_input = move |_| match file_input_ref.get() {
        Some(input) => input.click(),
        None => log::warn!("File input not mounted"),
    };

    let on_endpoint_change = move |ev: Event| {
        match Endpoint::from_path(&event_target_value(&ev)) {
            Some(e) => set_endpoint.set(e),
            None => log::warn!("Unknown endpoint {:?}", event_target_value(&ev)),
        }
    };

    let start_upload = {
        let ctx = ctx.clone();
        move |_| {
            let files = selected.get_untracked();
            if files.is_empty() {
                ctx.notifier().warning(ValidationError::NoFiles.to_string());
                return;
            }

            let endpoint = endpoint.get_untracked();
            let url = ctx.config().endpoint_url(endpoint);
            let options = UploadOptions::default().with_timeout(ctx.config().upload_timeout_ms);
            let rule = &ctx.config().rule;

            log::info!("📤 {} with {} file(s) → {}", endpoint.label(), files.len(), url);

            let tasks = match ctx.config().transport {
                TransportKind::Xhr => start_tasks(XhrTransport, rule, endpoint, files, &url, options),
                TransportKind::Fetch => start_tasks(FetchTransport, rule, endpoint, files, &url, options),
            };
            selected.set(Vec::new());

            for (label, task) in tasks {
                let id = next_id.get_value();
                next_id.set_value(id + 1);
                track(ctx.clone(), Tracking { uploads, cancels, last_result }, id, label, task);
            }
        }
    };

    let on_cancel = move |id: u64| {
        if let Some(handle) = cancels.with_value(|map| map.get(&id).cloned()) {
            handle.cancel();
        }
    };

    let download_result = {
        let ctx = ctx.clone();
        move |_| {
            let Some(value) = last_result.get_untracked() else { return };
            if let Err(e) = download_json(&value, RESULT_FILE_NAME) {
                log::error!("Download failed: {}", e);
                ctx.notifier().error(e.to_string());
            }
        }
    };

    view! {
        <div class="upload-section" id=ids.drop_zone>
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">"Drop PDF files here"</div>
            <div class="upload-hint">
                {format!("or pick them from disk ({}, up to {})", accept, format_size(ctx.config().rule.max_size))}
            </div>

            <input
                type="file"
                id=ids.file_input
                node_ref=file_input_ref
                accept=accept.clone()
                multiple=true
                style="display:none"
                on:change=on_file_change
            />
            <button class="upload-button" on:click=trigger_file_input>
                "Choose PDF files"
            </button>
        </div>

        <FileList files=selected/>

        <div class="upload-actions">
            <select class="endpoint-select" on:change=on_endpoint_change>
                {Endpoint::ALL
                    .into_iter()
                    .map(|e| view! {
                        <option value=e.path() selected=move || endpoint.get() == e>{e.label()}</option>
                    })
                    .collect_view()}
            </select>
            <button
                class="upload-button primary"
                disabled=move || selected.with(|list| list.is_empty())
                on:click=start_upload
            >
                "Upload"
            </button>
        </div>

        <UploadProgress uploads=uploads on_cancel=on_cancel/>

        <Show
            when=move || last_result.with(|r| r.is_some())
            fallback=|| view! { }
        >
            <div class="upload-result">
                <pre>
                    {move || last_result
                        .get()
                        .and_then(|v| serde_json::to_string_pretty(&v).ok())
                        .unwrap_or_default()}
                </pre>
                <button class="upload-button" on:click=download_result.clone()>
                    "Download result"
                </button>
            </div>
        </Show>
    }
}

/// One session per file, or a single batch session for batch endpoints.
fn start_tasks<T>(
    transport: T,
    rule: &ValidationRule,
    endpoint: Endpoint,
    files: Vec<File>,
    url: &str,
    options: UploadOptions,
) -> Vec<(String, UploadTask)>
where
    T: Transport<File = File> + Clone,
{
    let session = || UploadSession::new(transport.clone()).with_rule(rule.clone());

    if endpoint.is_batch() {
        let label = format!("{} ({} files)", endpoint.label(), files.len());
        vec![(label, session().start_batch(files, url, options))]
    } else {
        files
            .into_iter()
            .map(|file| (file.name(), session().start(file, url, options.clone())))
            .collect()
    }
}

#[derive(Clone, Copy)]
struct Tracking {
    uploads: RwSignal<Vec<UploadEntry>>,
    cancels: StoredValue<HashMap<u64, CancelHandle>>,
    last_result: RwSignal<Option<Value>>,
}

impl Tracking {
    fn update(&self, id: u64, f: impl FnOnce(&mut UploadEntry)) {
        let _ = self.uploads.try_update(|list| {
            if let Some(entry) = list.iter_mut().find(|e| e.id == id) {
                f(entry);
            }
        });
    }
}

/// Show a progress widget for `task` and surface its outcome.
fn track(ctx: AppContext, tracking: Tracking, id: u64, label: String, task: UploadTask) {
    tracking.uploads.update(|list| list.push(UploadEntry::new(id, label.clone())));
    tracking.cancels.update_value(|map| {
        map.insert(id, task.cancel_handle());
    });

    spawn_local(async move {
        let outcome = task
            .finish_with_progress(|percent| tracking.update(id, |e| e.progress = percent))
            .await;
        tracking.cancels.update_value(|map| {
            map.remove(&id);
        });

        match outcome {
            UploadOutcome::Success(value) => {
                log::info!("✅ {} uploaded", label);
                ctx.notifier().success(format!("{} uploaded", label));
                let _ = tracking.last_result.try_set(Some(value));
                tracking.update(id, |e| e.finish(UploadStatus::Done));
            }
            UploadOutcome::Failure(err) => {
                log::error!("❌ {} failed ({}): {}", label, err.reason(), err);
                ctx.notifier().error(err.to_string());
                tracking.update(id, |e| e.finish(UploadStatus::Failed(err.to_string())));
            }
        }

        let uploads = tracking.uploads;
        ctx.scheduler()
            .schedule(
                FINISHED_WIDGET_MS,
                Box::new(move || {
                    let _ = uploads.try_update(|list| list.retain(|e| e.id != id));
                }),
            )
            .detach();
    });
}
