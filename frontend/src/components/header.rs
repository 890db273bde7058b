use leptos::*;

use crate::config::APP_NAME;
use crate::context::AppContext;
use crate::helpers::Throttle;

/// Clicks on the theme toggle closer together than this are ignored.
const THEME_TOGGLE_COOLDOWN_MS: u32 = 300;

#[component]
pub fn Header(ctx: AppContext) -> impl IntoView {
    let initial = ctx.theme();

    let toggle = {
        let ctx = ctx.clone();
        Throttle::new(ctx.scheduler(), THEME_TOGGLE_COOLDOWN_MS, move |_: ()| {
            let theme = ctx.toggle_theme();
            log::info!("🎨 Theme switched to {}", theme);
        })
    };

    view! {
        <header>
            <div class="header-left">
                <a href="/" class="logo">{APP_NAME}</a>
                <span class="badge">"PDF toolkit"</span>
            </div>
            <div class="header-right">
                <button
                    class="theme-toggle"
                    title="Toggle light / dark theme"
                    on:click=move |_| {
                        toggle.call(());
                    }
                >
                    <span class="theme-icon">{initial.icon()}</span>
                </button>
            </div>
        </header>
    }
}
