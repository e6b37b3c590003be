//! Vello-based backdrop renderer.
//!
//! Draws everything that sits *under* the egui widget cards: the wallpaper
//! pattern, the hard offset shadow of each card, and while a drag is active
//! the bounds the card is kept in plus a ghost of where it came from.

use crate::renderer::{GridStyle, RenderContext, Renderer};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Stroke};
use peniko::{Color, Fill};
use tableau_core::{BoundsPolicy, CanvasController, WidgetId};
use vello::Scene;

/// Spacing of the wallpaper pattern in logical pixels.
pub const GRID_SIZE: f64 = 24.0;

/// Shadow offset of a resting card.
const SHADOW_OFFSET: f64 = 4.0;
/// Shadow offset of the card being dragged.
const LIFTED_SHADOW_OFFSET: f64 = 8.0;
const CARD_RADIUS: f64 = 8.0;

/// Vello-based renderer for the canvas backdrop.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self { scene: Scene::new() }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }
}

/// On-screen rectangle of a widget this frame, following the live drag.
pub fn widget_rect(canvas: &CanvasController, id: &WidgetId) -> Option<Rect> {
    match canvas.session() {
        Some(session) if &session.active_id == id => {
            let rect = session.origin_rect?;
            Some(rect + (canvas.visual_position(id) - session.origin))
        }
        _ => canvas.layout(id),
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        // Canvas coordinates are logical pixels.
        let transform = Affine::scale(ctx.scale_factor);
        let viewport = Rect::from_origin_size(Point::ZERO, ctx.logical_size());

        match ctx.grid_style {
            GridStyle::None => {}
            GridStyle::Lines => self.render_grid_lines(viewport, transform, GRID_SIZE, ctx.grid_color),
            GridStyle::CrossPlus => self.render_grid_crosses(viewport, transform, GRID_SIZE, ctx.grid_color),
            GridStyle::Dots => self.render_grid_dots(viewport, transform, GRID_SIZE, ctx.grid_color),
        }

        let canvas = ctx.canvas;
        // Widget geometry is relative to the canvas origin.
        let transform = transform * Affine::translate(ctx.canvas_offset);

        if let Some(session) = canvas.session() {
            if canvas.config().bounds == BoundsPolicy::Viewport {
                self.render_drag_bounds(canvas.viewport(), transform, ctx.highlight_color);
            }
            if let Some(origin_rect) = session.origin_rect {
                self.render_ghost(origin_rect, transform, ctx.highlight_color);
            }
        }

        for descriptor in canvas.paint_order() {
            let Some(rect) = widget_rect(canvas, &descriptor.id) else {
                continue;
            };
            let offset = if canvas.is_dragging(&descriptor.id) {
                LIFTED_SHADOW_OFFSET
            } else {
                SHADOW_OFFSET
            };
            self.render_shadow(rect, offset, transform, ctx.shadow_color);
        }
    }
}

impl VelloRenderer {
    fn render_shadow(&mut self, rect: Rect, offset: f64, transform: Affine, color: Color) {
        let shadow = RoundedRect::from_rect(rect + kurbo::Vec2::new(offset, offset), CARD_RADIUS);
        self.scene.fill(Fill::NonZero, transform, color, None, &shadow);
    }

    /// Dashed outline of the region a dragged card is kept in.
    fn render_drag_bounds(&mut self, viewport: Rect, transform: Affine, color: Color) {
        let stroke = Stroke::new(2.0).with_dashes(0.0, [8.0, 6.0]);
        self.scene
            .stroke(&stroke, transform, color.with_alpha(0.6), None, &viewport.inset(-2.0));
    }

    /// Where the dragged card was picked up.
    fn render_ghost(&mut self, rect: Rect, transform: Affine, color: Color) {
        let ghost = RoundedRect::from_rect(rect, CARD_RADIUS);
        self.scene
            .fill(Fill::NonZero, transform, color.with_alpha(0.08), None, &ghost);
        let stroke = Stroke::new(1.5).with_dashes(0.0, [4.0, 4.0]);
        self.scene
            .stroke(&stroke, transform, color.with_alpha(0.5), None, &ghost);
    }
}

impl VelloRenderer {
    /// Calculate grid bounds snapped to the grid.
    fn grid_bounds(&self, viewport: Rect, grid_size: f64) -> (f64, f64, f64, f64) {
        let start_x = (viewport.x0 / grid_size).floor() * grid_size;
        let start_y = (viewport.y0 / grid_size).floor() * grid_size;
        let end_x = (viewport.x1 / grid_size).ceil() * grid_size;
        let end_y = (viewport.y1 / grid_size).ceil() * grid_size;

        (start_x, start_y, end_x, end_y)
    }

    /// Render full grid lines.
    fn render_grid_lines(&mut self, viewport: Rect, transform: Affine, grid_size: f64, color: Color) {
        let stroke = Stroke::new(0.5);
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += grid_size;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += grid_size;
        }
        self.scene.stroke(&stroke, transform, color, None, &path);
    }

    /// Render grid as small crosses (+) at intersections.
    fn render_grid_crosses(&mut self, viewport: Rect, transform: Affine, grid_size: f64, color: Color) {
        let stroke = Stroke::new(1.0);
        let cross_size = 3.0;
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            let mut y = start_y;
            while y <= end_y {
                path.move_to(Point::new(x - cross_size, y));
                path.line_to(Point::new(x + cross_size, y));
                path.move_to(Point::new(x, y - cross_size));
                path.line_to(Point::new(x, y + cross_size));
                y += grid_size;
            }
            x += grid_size;
        }
        self.scene.stroke(&stroke, transform, color, None, &path);
    }

    /// Render grid as dots at intersections.
    fn render_grid_dots(&mut self, viewport: Rect, transform: Affine, grid_size: f64, color: Color) {
        let dot_size = 1.5;
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, grid_size);

        // Batch all dots into a single path
        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            let mut y = start_y;
            while y <= end_y {
                path.move_to(Point::new(x - dot_size, y - dot_size));
                path.line_to(Point::new(x + dot_size, y - dot_size));
                path.line_to(Point::new(x + dot_size, y + dot_size));
                path.line_to(Point::new(x - dot_size, y + dot_size));
                path.close_path();
                y += grid_size;
            }
            x += grid_size;
        }
        self.scene.fill(Fill::NonZero, transform, color, None, &path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};
    use tableau_core::{CanvasConfig, DragEvent, WidgetKind};

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_widgets() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = CanvasController::default();
        let id = canvas.add_tool(WidgetKind::Timer);
        canvas.record_layout(&id, Rect::new(800.0, 400.0, 1000.0, 550.0));

        let ctx = RenderContext::new(&canvas, Size::new(1280.0, 800.0));
        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_canvas_offset_changes_scene() {
        let mut canvas = CanvasController::default();
        let id = canvas.add_tool(WidgetKind::Instruction);
        canvas.record_layout(&id, Rect::new(100.0, 100.0, 400.0, 300.0));

        let mut plain = VelloRenderer::new();
        plain.build_scene(&RenderContext::new(&canvas, Size::new(1280.0, 800.0)).with_grid(GridStyle::None));
        let mut shifted = VelloRenderer::new();
        shifted.build_scene(
            &RenderContext::new(&canvas, Size::new(1280.0, 800.0))
                .with_grid(GridStyle::None)
                .with_canvas_offset(Vec2::new(240.0, 48.0)),
        );
        assert_ne!(plain.scene().encoding().transforms, shifted.scene().encoding().transforms);
    }

    #[test]
    fn test_widget_rect_follows_drag() {
        let config = CanvasConfig::default().with_viewport(Size::new(1920.0, 1080.0));
        let mut canvas = CanvasController::new(config);
        let id = canvas.add_tool(WidgetKind::Timer);
        canvas.record_layout(&id, Rect::new(800.0, 400.0, 1000.0, 550.0));

        canvas.handle(DragEvent::Start { id: id.clone() });
        canvas.handle(DragEvent::Move { delta: Vec2::new(-20.0, 30.0) });
        assert_eq!(widget_rect(&canvas, &id), Some(Rect::new(780.0, 430.0, 980.0, 580.0)));
    }

    #[test]
    fn test_unmeasured_widget_has_no_rect() {
        let mut canvas = CanvasController::default();
        let id = canvas.add_tool(WidgetKind::Groups);
        assert_eq!(widget_rect(&canvas, &id), None);
    }
}
