//! WebAssembly entry point and platform-specific code.

use wasm_bindgen::prelude::*;

/// Host name of the page, e.g. `localhost` or `tableau.example.org`.
///
/// Twitch refuses to embed its player unless it is told the embedding host.
pub fn page_host() -> Option<String> {
    let window = web_sys::window()?;
    window.location().hostname().ok().filter(|host| !host.is_empty())
}

/// Copy text to the clipboard (fire and forget).
pub fn copy_text(text: &str) {
    let text = text.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(window) = web_sys::window() {
            let promise = window.navigator().clipboard().write_text(&text);
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::warn!("Clipboard write failed: {:?}", e);
            }
        }
    });
}

/// Open a URL in a new tab.
pub fn open_url(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target(url, "_blank") {
        log::warn!("Failed to open {}: {:?}", url, e);
    }
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }

    log::info!("Starting Tableau (WASM)");
    if let Some(host) = page_host() {
        log::info!("Served from {}", host);
    }

    crate::App::run().await;
}
