//! Per-upload progress widgets.

use leptos::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Done,
    Failed(String),
}

/// One running (or just finished) upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadEntry {
    pub id: u64,
    pub label: String,
    pub progress: u8,
    pub status: UploadStatus,
}

impl UploadEntry {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            progress: 0,
            status: UploadStatus::Uploading,
        }
    }

    /// Finished entries always show a full bar.
    pub fn finish(&mut self, status: UploadStatus) {
        self.progress = 100;
        self.status = status;
    }

    pub fn status_text(&self) -> String {
        match &self.status {
            UploadStatus::Uploading if self.progress >= 100 => "Processing...".to_string(),
            UploadStatus::Uploading => format!("Uploading... {}%", self.progress),
            UploadStatus::Done => "Upload complete".to_string(),
            UploadStatus::Failed(message) => message.clone(),
        }
    }
}

#[component]
pub fn UploadProgress(
    uploads: RwSignal<Vec<UploadEntry>>,
    #[prop(into)] on_cancel: Callback<u64>,
) -> impl IntoView {
    view! {
        <div class="upload-progress-list">
            <For
                each=move || uploads.get()
                key=|entry| entry.id
                children=move |entry| {
                    let id = entry.id;
                    let current = move || uploads.with(|list| list.iter().find(|e| e.id == id).cloned());
                    let percent = move || format!("{}%", current().map(|e| e.progress).unwrap_or(100));
                    let status = move || current().map(|e| e.status);

                    view! {
                        <div
                            class="upload-progress"
                            class:success=move || status() == Some(UploadStatus::Done)
                            class:error=move || matches!(status(), Some(UploadStatus::Failed(_)))
                        >
                            <div class="upload-progress-header">
                                <span class="file-name">{entry.label}</span>
                                <span class="progress-percent">{percent}</span>
                            </div>
                            <div class="progress-bar">
                                <div class="progress-fill" style:width=percent></div>
                            </div>
                            <div class="progress-status">
                                {move || current().map(|e| e.status_text()).unwrap_or_default()}
                            </div>
                            <Show
                                when=move || status() == Some(UploadStatus::Uploading)
                                fallback=|| view! { }
                            >
                                <button class="cancel-button" on:click=move |_| on_cancel.call(id)>
                                    "Cancel"
                                </button>
                            </Show>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        let mut entry = UploadEntry::new(1, "report.pdf");
        assert_eq!(entry.status_text(), "Uploading... 0%");

        entry.progress = 42;
        assert_eq!(entry.status_text(), "Uploading... 42%");

        entry.progress = 100;
        assert_eq!(entry.status_text(), "Processing...");

        entry.finish(UploadStatus::Failed("Upload timed out".into()));
        assert_eq!(entry.status_text(), "Upload timed out");
        assert_eq!(entry.progress, 100);
    }
}
