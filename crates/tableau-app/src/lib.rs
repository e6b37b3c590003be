//! Tableau Application
//!
//! The application shell: windowing, the Vello backdrop, the egui widget
//! layer, and the platform loaders feeding the widgets.

mod app;
mod board;
mod drag_bridge;
mod grab;
mod icons;
mod loader;
mod platform;
mod ui;
mod views;

pub use app::{App, AppConfig};
pub use board::{Board, WidgetState};
pub use drag_bridge::{DragBridge, PointerFrame};
pub use loader::MediaLoader;
pub use ui::{UiAction, UiOutput, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
