//! Tableau Render Library
//!
//! Renderer abstraction and implementations for the Tableau canvas backdrop.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{GridStyle, RenderContext, Renderer};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{GRID_SIZE, VelloRenderer, widget_rect};
