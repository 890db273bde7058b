//! Files waiting to be uploaded.

use leptos::*;
use web_sys::File;

use crate::format::format_size;
use crate::types::{FileDescriptor, FileSource};

const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M";

#[component]
pub fn FileList(files: RwSignal<Vec<File>>) -> impl IntoView {
    view! {
        <Show
            when=move || files.with(|list| !list.is_empty())
            fallback=|| view! { }
        >
            <div class="file-list">
                <For
                    each=move || files.get().into_iter().enumerate()
                    key=|(index, file)| (*index, file.name())
                    children=move |(index, file)| {
                        let descriptor = file.descriptor();
                        let details = file_details(&descriptor);
                        view! {
                            <div class="file-item">
                                <span class="file-icon">"📄"</span>
                                <span class="file-name">{descriptor.name}</span>
                                <span class="file-size">{format_size(descriptor.size)}</span>
                                <span class="file-details">{details}</span>
                                <button
                                    class="file-remove"
                                    title="Remove"
                                    on:click=move |_| files.update(|list| {
                                        if index < list.len() {
                                            list.remove(index);
                                        }
                                    })
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}

/// MIME type and last-modified time (UTC), whichever the browser reported.
fn file_details(descriptor: &FileDescriptor) -> String {
    let mime = descriptor.mime_type.as_deref().filter(|m| !m.is_empty()).map(str::to_owned);
    let modified = descriptor
        .last_modified
        .map(|t| format!("modified {}", t.format(MODIFIED_FORMAT)));

    mime.into_iter().chain(modified).collect::<Vec<_>>().join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_details_show_type_and_modified_time() {
        let mut descriptor = FileDescriptor::new("report.pdf", 2048).with_mime_type("application/pdf");
        descriptor.last_modified = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 0).single();

        assert_eq!(file_details(&descriptor), "application/pdf · modified 2024-03-01 14:05");
    }

    #[test]
    fn test_details_skip_what_is_unknown() {
        let bare = FileDescriptor::new("scan.pdf", 10);
        assert_eq!(file_details(&bare), "");

        let untyped = FileDescriptor::new("scan.pdf", 10).with_mime_type("");
        assert_eq!(file_details(&untyped), "");
    }
}
