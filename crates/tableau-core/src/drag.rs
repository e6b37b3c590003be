//! Drag events and the in-flight drag session.

use kurbo::{Point, Rect, Vec2};

use crate::position::WidgetId;

/// Drag lifecycle event, produced by the sensors and consumed by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// A drag on `id` was activated.
    Start { id: WidgetId },
    /// Pointer displacement since activation.
    Move { delta: Vec2 },
    /// The drag finished with the given total displacement.
    End { id: WidgetId, delta: Vec2 },
    /// The drag was aborted (focus loss, escape).
    Cancel,
}

/// State of one active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Widget being dragged.
    pub active_id: WidgetId,
    /// Committed position at drag start.
    pub origin: Point,
    /// Measured widget rectangle at drag start.
    pub origin_rect: Option<Rect>,
    /// Current unbounded delta.
    pub delta: Vec2,
}

impl DragSession {
    pub fn new(active_id: WidgetId, origin: Point, origin_rect: Option<Rect>) -> Self {
        Self {
            active_id,
            origin,
            origin_rect,
            delta: Vec2::ZERO,
        }
    }

    /// Rectangle used for bounding.
    ///
    /// Falls back to a zero-size rect at the origin when the widget was never
    /// measured, so the committed top-left corner still lands in the region.
    pub fn bounding_rect(&self) -> Rect {
        self.origin_rect
            .unwrap_or_else(|| Rect::from_origin_size(self.origin, (0.0, 0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_zero_delta() {
        let s = DragSession::new(WidgetId::new("timer-0"), Point::new(1.0, 2.0), None);
        assert_eq!(s.delta, Vec2::ZERO);
    }

    #[test]
    fn test_bounding_rect_fallback() {
        let s = DragSession::new(WidgetId::new("timer-0"), Point::new(30.0, 40.0), None);
        assert_eq!(s.bounding_rect(), Rect::new(30.0, 40.0, 30.0, 40.0));

        let measured = Rect::new(30.0, 40.0, 230.0, 190.0);
        let s = DragSession::new(WidgetId::new("timer-0"), Point::new(30.0, 40.0), Some(measured));
        assert_eq!(s.bounding_rect(), measured);
    }
}
