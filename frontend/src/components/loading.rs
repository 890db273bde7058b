//! Loading overlay. Shown and hidden by the [`AppContext`](crate::AppContext).

use leptos::*;

#[component]
pub fn LoadingOverlay(id: String) -> impl IntoView {
    view! {
        <div id=id class="loading-overlay" style="display: none;">
            <div class="loading-spinner"></div>
            <div class="loading-text">"Loading..."</div>
        </div>
    }
}
