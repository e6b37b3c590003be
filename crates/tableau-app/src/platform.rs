//! Clipboard, links and page host, per platform.
//!
//! On native, egui-winit handles clipboard and links from the platform
//! output. In the browser, the winit backend has neither, so the page APIs
//! are called directly.

/// Host name used when building embed URLs outside a browser.
const NATIVE_HOST: &str = "localhost";

#[cfg(not(target_arch = "wasm32"))]
pub fn copy_text(ctx: &egui::Context, text: &str) {
    ctx.copy_text(text.to_string());
}

#[cfg(target_arch = "wasm32")]
pub fn copy_text(_ctx: &egui::Context, text: &str) {
    crate::web::copy_text(text);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_url(ctx: &egui::Context, url: &str) {
    log::info!("Opening {}", url);
    ctx.open_url(egui::OpenUrl::new_tab(url));
}

#[cfg(target_arch = "wasm32")]
pub fn open_url(_ctx: &egui::Context, url: &str) {
    log::info!("Opening {}", url);
    crate::web::open_url(url);
}

/// Host name of the page serving the app.
#[cfg(not(target_arch = "wasm32"))]
pub fn page_host() -> String {
    NATIVE_HOST.to_string()
}

#[cfg(target_arch = "wasm32")]
pub fn page_host() -> String {
    crate::web::page_host().unwrap_or_else(|| NATIVE_HOST.to_string())
}
