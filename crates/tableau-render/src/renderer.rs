//! Renderer trait abstraction.

use kurbo::{Size, Vec2};
use peniko::Color;
use tableau_core::CanvasController;

/// Wallpaper pattern behind the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// Plain background.
    None,
    /// Full grid lines (squared paper).
    Lines,
    /// Only corner crosses (+).
    CrossPlus,
    /// Only corner dots (.).
    #[default]
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::CrossPlus,
            GridStyle::CrossPlus => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "Uni",
            GridStyle::Lines => "Carreaux",
            GridStyle::CrossPlus => "Croix",
            GridStyle::Dots => "Points",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a CanvasController,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Wallpaper pattern.
    pub grid_style: GridStyle,
    /// Pattern color.
    pub grid_color: Color,
    /// Hard offset shadow under each widget.
    pub shadow_color: Color,
    /// Outline of the drag bounds and the drop target.
    pub highlight_color: Color,
    /// Where the canvas origin sits in the window, in logical pixels.
    pub canvas_offset: Vec2,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a CanvasController, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::default(),
            grid_color: Color::from_rgba8(160, 160, 160, 70),
            shadow_color: Color::from_rgba8(0, 0, 0, 255),
            highlight_color: Color::from_rgba8(59, 130, 246, 255),
            canvas_offset: Vec2::ZERO,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_grid_color(mut self, color: Color) -> Self {
        self.grid_color = color;
        self
    }

    pub fn with_shadow_color(mut self, color: Color) -> Self {
        self.shadow_color = color;
        self
    }

    pub fn with_highlight(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }

    /// Shift widget geometry by the space taken by panels.
    pub fn with_canvas_offset(mut self, offset: Vec2) -> Self {
        self.canvas_offset = offset;
        self
    }

    /// Viewport size in logical pixels.
    pub fn logical_size(&self) -> Size {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        Size::new(self.viewport_size.width / scale, self.viewport_size.height / scale)
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_style_cycles() {
        let mut style = GridStyle::None;
        for _ in 0..4 {
            style = style.next();
        }
        assert_eq!(style, GridStyle::None);
    }

    #[test]
    fn test_logical_size() {
        let canvas = CanvasController::default();
        let ctx = RenderContext::new(&canvas, Size::new(2000.0, 1000.0)).with_scale_factor(2.0);
        assert_eq!(ctx.logical_size(), Size::new(1000.0, 500.0));
    }
}
