//! Property-based invariant tests for widget positioning.
//!
//! 1. The bounded transform keeps a fitting element inside the viewport.
//! 2. Bounding is idempotent and passes transforms through without a measurement.
//! 3. Transforms that already fit are left untouched.
//! 4. Committed drags land inside the viewport and only touch the dragged widget.
//! 5. Reconciling a grown widget list preserves existing positions.

use kurbo::{Point, Rect, Size, Vec2};
use proptest::prelude::*;
use tableau_core::{
    CanvasConfig, CanvasController, DragEvent, PositionStore, WidgetDescriptor, WidgetId,
    WidgetKind, restrict_to_region,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn viewport() -> impl Strategy<Value = Rect> {
    (200.0f64..3000.0, 200.0f64..2000.0).prop_map(|(w, h)| Rect::new(0.0, 0.0, w, h))
}

/// An element that fits inside a `w`×`h` viewport.
fn element_within(w: f64, h: f64) -> impl Strategy<Value = Rect> {
    (0.0..w, 0.0..h).prop_flat_map(move |(x, y)| {
        (Just(x), Just(y), 0.0..=(w - x), 0.0..=(h - y))
            .prop_map(|(x, y, width, height)| Rect::new(x, y, x + width, y + height))
    })
}

fn transform() -> impl Strategy<Value = Vec2> {
    (-5000.0f64..5000.0, -5000.0f64..5000.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn kind() -> impl Strategy<Value = WidgetKind> {
    prop::sample::select(WidgetKind::ALL.to_vec())
}

const EPS: f64 = 1e-9;

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Bounding modifier
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bounded_element_stays_inside(
        (region, rect) in viewport().prop_flat_map(|r| (Just(r), element_within(r.x1, r.y1))),
        t in transform(),
    ) {
        let bounded = restrict_to_region(t, Some(rect), region);
        let moved = rect + bounded;
        prop_assert!(moved.x0 >= region.x0 - EPS);
        prop_assert!(moved.y0 >= region.y0 - EPS);
        prop_assert!(moved.x1 <= region.x1 + EPS);
        prop_assert!(moved.y1 <= region.y1 + EPS);
    }

    #[test]
    fn bounding_is_idempotent(
        region in viewport(),
        x in -1000.0f64..4000.0,
        y in -1000.0f64..4000.0,
        w in 0.0f64..5000.0,
        h in 0.0f64..5000.0,
        t in transform(),
    ) {
        let rect = Rect::new(x, y, x + w, y + h);
        let once = restrict_to_region(t, Some(rect), region);
        prop_assert_eq!(restrict_to_region(once, Some(rect), region), once);
    }

    #[test]
    fn unmeasured_passes_through(region in viewport(), t in transform()) {
        prop_assert_eq!(restrict_to_region(t, None, region), t);
    }

    #[test]
    fn fitting_transform_is_untouched(
        (region, rect) in viewport().prop_flat_map(|r| (Just(r), element_within(r.x1, r.y1))),
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        // Pick a transform that keeps the element inside.
        let tx = (region.x0 - rect.x0) + fx * ((region.x1 - rect.x1) - (region.x0 - rect.x0));
        let ty = (region.y0 - rect.y0) + fy * ((region.y1 - rect.y1) - (region.y0 - rect.y0));
        let t = Vec2::new(tx, ty);
        let bounded = restrict_to_region(t, Some(rect), region);
        prop_assert!((bounded - t).hypot() < 1e-6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Canvas commits
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn committed_drag_stays_in_viewport_and_is_isolated(
        kinds in prop::collection::vec(kind(), 1..6),
        pick in any::<prop::sample::Index>(),
        delta in transform(),
        size in (200.0f64..600.0, 150.0f64..400.0),
    ) {
        let viewport = Size::new(1920.0, 1080.0);
        let mut canvas = CanvasController::new(CanvasConfig::default().with_viewport(viewport));
        let ids: Vec<WidgetId> = kinds.iter().map(|k| canvas.add_tool(*k)).collect();
        for id in &ids {
            let origin = canvas.position(id);
            canvas.record_layout(id, Rect::from_origin_size(origin, size));
        }
        canvas.take_changed();
        let before: Vec<Point> = ids.iter().map(|id| canvas.position(id)).collect();

        let target = pick.get(&ids).clone();
        canvas.handle(DragEvent::Start { id: target.clone() });
        canvas.handle(DragEvent::Move { delta });
        canvas.handle(DragEvent::End { id: target.clone(), delta });

        let p = canvas.position(&target);
        prop_assert!(p.x >= -EPS && p.y >= -EPS);
        prop_assert!(p.x + size.0 <= viewport.width + EPS || p.x <= EPS);
        prop_assert!(p.y + size.1 <= viewport.height + EPS || p.y <= EPS);
        prop_assert_eq!(canvas.take_changed(), vec![target.clone()]);
        for (id, old) in ids.iter().zip(before) {
            if id != &target {
                prop_assert_eq!(canvas.position(id), old);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Store reconciliation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconcile_preserves_existing(
        moves in prop::collection::vec((-500.0f64..2500.0, -500.0f64..1500.0), 1..8),
        extra in 0usize..5,
    ) {
        let descriptors: Vec<WidgetDescriptor> = (0..moves.len() + extra)
            .map(|i| WidgetDescriptor {
                id: WidgetId::new(format!("timer-{i}")),
                kind: WidgetKind::Timer,
                initial_position: Point::new(800.0, 400.0),
            })
            .collect();

        let mut store = PositionStore::from_descriptors(&descriptors[..moves.len()]);
        for (d, (x, y)) in descriptors.iter().zip(&moves) {
            store.set(d.id.clone(), Point::new(*x, *y));
        }
        let added = store.reconcile(&descriptors);

        prop_assert_eq!(added, extra);
        prop_assert_eq!(store.len(), descriptors.len());
        for (d, (x, y)) in descriptors.iter().zip(&moves) {
            prop_assert_eq!(store.get(&d.id, d.initial_position), Point::new(*x, *y));
        }
        for d in &descriptors[moves.len()..] {
            prop_assert_eq!(store.get(&d.id, Point::ZERO), d.initial_position);
        }
    }
}
