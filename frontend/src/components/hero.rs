//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"PDFTool"</h1>
            <p class="subtitle">
                "Merge, inspect, split and watermark PDF documents. "
                "Drop your files below; everything is processed by the PDFTool API."
            </p>
        </div>
    }
}
