//! Footer component

use leptos::*;

use crate::config::APP_NAME;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>{APP_NAME} " • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href="/api/v1/pdf" class="footer-link" target="_blank">
                    "API"
                </a>
                <a href="https://github.com/pdftool" class="footer-link" target="_blank">
                    "GitHub"
                </a>
            </div>
        </footer>
    }
}
