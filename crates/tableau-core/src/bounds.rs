//! Bounding modifier for drag transforms.

use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Region a dragged widget is kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BoundsPolicy {
    /// Keep the widget's bounding box inside the visible viewport.
    #[default]
    Viewport,
    /// No clamping at all.
    Unbounded,
}

impl BoundsPolicy {
    /// Cycle to the next policy.
    pub fn next(self) -> Self {
        match self {
            BoundsPolicy::Viewport => BoundsPolicy::Unbounded,
            BoundsPolicy::Unbounded => BoundsPolicy::Viewport,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            BoundsPolicy::Viewport => "Viewport",
            BoundsPolicy::Unbounded => "Unbounded",
        }
    }

    /// Apply the policy to a proposed transform.
    pub fn apply(self, transform: Vec2, element: Option<Rect>, viewport: Rect) -> Vec2 {
        match self {
            BoundsPolicy::Viewport => restrict_to_region(transform, element, viewport),
            BoundsPolicy::Unbounded => transform,
        }
    }
}

/// Clamp `transform` so that `element` translated by it stays inside `region`.
///
/// `element` is the widget's rectangle before the transform. Without a
/// measurement the transform passes through unchanged. When the element is
/// larger than the region on an axis, its leading edge is pinned to the
/// region's leading edge.
pub fn restrict_to_region(transform: Vec2, element: Option<Rect>, region: Rect) -> Vec2 {
    let Some(rect) = element else {
        return transform;
    };
    Vec2::new(
        clamp_axis(transform.x, region.x0 - rect.x0, region.x1 - rect.x1),
        clamp_axis(transform.y, region.y0 - rect.y0, region.y1 - rect.y1),
    )
}

fn clamp_axis(value: f64, low: f64, high: f64) -> f64 {
    // f64::clamp panics when low > high, which happens for oversized elements.
    value.min(high).max(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1920.0, 1080.0)
    }

    #[test]
    fn test_inside_is_unchanged() {
        let rect = Rect::new(300.0, 100.0, 500.0, 250.0);
        let t = restrict_to_region(Vec2::new(50.0, -20.0), Some(rect), viewport());
        assert_eq!(t, Vec2::new(50.0, -20.0));
    }

    #[test]
    fn test_clamps_to_top_left() {
        let rect = Rect::new(300.0, 100.0, 500.0, 250.0);
        let t = restrict_to_region(Vec2::new(-400.0, -200.0), Some(rect), viewport());
        assert_eq!(t, Vec2::new(-300.0, -100.0));
    }

    #[test]
    fn test_clamps_to_bottom_right() {
        let rect = Rect::new(1700.0, 900.0, 1900.0, 1050.0);
        let t = restrict_to_region(Vec2::new(500.0, 500.0), Some(rect), viewport());
        assert_eq!(t, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn test_missing_measurement_passes_through() {
        let t = restrict_to_region(Vec2::new(-5000.0, 7.0), None, viewport());
        assert_eq!(t, Vec2::new(-5000.0, 7.0));
    }

    #[test]
    fn test_oversized_element_pins_leading_edge() {
        let rect = Rect::new(100.0, 0.0, 2100.0, 100.0);
        let t = restrict_to_region(Vec2::new(300.0, 0.0), Some(rect), viewport());
        assert_eq!(t.x, -100.0);
    }

    #[test]
    fn test_idempotent() {
        let rect = Rect::new(10.0, 10.0, 60.0, 60.0);
        let once = restrict_to_region(Vec2::new(3000.0, -80.0), Some(rect), viewport());
        let twice = restrict_to_region(once, Some(rect), viewport());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unbounded_policy() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let t = BoundsPolicy::Unbounded.apply(Vec2::new(-50.0, -50.0), Some(rect), viewport());
        assert_eq!(t, Vec2::new(-50.0, -50.0));
        assert_eq!(BoundsPolicy::Viewport.next(), BoundsPolicy::Unbounded);
    }
}
