//! Toast stack.

use leptos::*;

use crate::notifier::{Notifier, ToastSurface};
use crate::types::{NotificationId, NotificationRecord};

/// The toast list signal doubles as the notifier's drawing surface.
impl ToastSurface for RwSignal<Vec<NotificationRecord>> {
    fn show(&self, record: &NotificationRecord) {
        let record = record.clone();
        if self.try_update(|list| list.push(record)).is_none() {
            log::warn!("Toast dropped, notification host is gone");
        }
    }

    fn remove(&self, id: NotificationId) {
        let _ = self.try_update(|list| list.retain(|r| r.id != id));
    }
}

#[component]
pub fn NotificationHost(toasts: RwSignal<Vec<NotificationRecord>>, notifier: Notifier) -> impl IntoView {
    view! {
        <div class="notification-container">
            <For
                each=move || toasts.get()
                key=|record| record.id.0
                children=move |record| {
                    let notifier = notifier.clone();
                    let id = record.id;
                    view! {
                        <div class=format!("notification {}", record.severity.css_class())>
                            <span class="notification-icon">{record.severity.icon()}</span>
                            <span class="notification-message">{record.message}</span>
                            <button
                                class="notification-close"
                                on:click=move |_| {
                                    notifier.dismiss(id);
                                }
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
