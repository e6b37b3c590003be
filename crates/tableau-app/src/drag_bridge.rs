//! Feeds egui pointer state to the drag sensor.
//!
//! egui reports pointer state per frame; the sensor wants discrete inputs.
//! The views fill a [`PointerFrame`] with what happened over the grab
//! surfaces, and [`DragBridge::step`] turns it into sensor inputs and the
//! resulting drag events, in order.

use kurbo::Point;
use tableau_core::{DragEvent, DragSensor, PointerInput, PointerKind, PointerTarget, SensorConfig};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Pointer state of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerFrame {
    /// A primary press started this frame: what it landed on, and where.
    pub pressed: Option<(PointerTarget, Point)>,
    /// Latest pointer position, if the pointer is over the window.
    pub pos: Option<Point>,
    /// The primary button was released this frame.
    pub released: bool,
    /// The input comes from a touch screen.
    pub touch: bool,
    /// The window has focus.
    pub focused: bool,
}

impl Default for PointerFrame {
    fn default() -> Self {
        Self {
            pressed: None,
            pos: None,
            released: false,
            touch: false,
            focused: true,
        }
    }
}

impl PointerFrame {
    /// Read the frame from egui. `pressed_target` is set by the views when the
    /// press landed on a grab surface.
    pub fn from_egui(ctx: &egui::Context, pressed_target: Option<PointerTarget>) -> Self {
        ctx.input(|i| {
            let to_point = |p: egui::Pos2| Point::new(p.x as f64, p.y as f64);
            let pressed = if i.pointer.primary_pressed() {
                let origin = i.pointer.press_origin().or(i.pointer.latest_pos());
                origin.map(|p| (pressed_target.unwrap_or(PointerTarget::Control), to_point(p)))
            } else {
                None
            };
            Self {
                pressed,
                pos: i.pointer.latest_pos().map(to_point),
                released: i.pointer.primary_released(),
                touch: i.any_touches(),
                focused: i.focused,
            }
        })
    }
}

/// Owns the sensor and remembers what it last told it.
#[derive(Debug, Clone, Default)]
pub struct DragBridge {
    sensor: DragSensor,
    last_pos: Option<Point>,
}

impl DragBridge {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            sensor: DragSensor::new(config),
            last_pos: None,
        }
    }

    /// Whether a press is being tracked (pending or active).
    pub fn is_tracking(&self) -> bool {
        self.sensor.is_active() || self.sensor.is_pending()
    }

    /// Translate one frame into drag events.
    pub fn step(&mut self, frame: PointerFrame, now: Instant) -> Vec<DragEvent> {
        let mut events = Vec::new();

        if !frame.focused {
            self.last_pos = None;
            events.extend(self.sensor.handle(PointerInput::Lost));
            return events;
        }

        if let Some((target, pos)) = frame.pressed {
            let kind = if frame.touch { PointerKind::Touch } else { PointerKind::Mouse };
            events.extend(self.sensor.handle(PointerInput::Down {
                target,
                kind,
                pos,
                at: now,
            }));
            self.last_pos = Some(pos);
        }

        if let Some(pos) = frame.pos {
            if self.last_pos != Some(pos) {
                self.last_pos = Some(pos);
                let event = self.sensor.handle(PointerInput::Move { pos, at: now });
                let activated = matches!(event, Some(DragEvent::Start { .. }));
                events.extend(event);
                // The activating move also carries the first delta.
                if activated {
                    events.extend(self.sensor.handle(PointerInput::Move { pos, at: now }));
                }
            }
        }

        events.extend(self.sensor.poll(now));

        if frame.released {
            let pos = frame.pos.or(self.last_pos).unwrap_or(Point::ZERO);
            events.extend(self.sensor.handle(PointerInput::Up { pos, at: now }));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use std::time::Duration;
    use tableau_core::WidgetId;

    fn press(id: &str, x: f64, y: f64) -> PointerFrame {
        PointerFrame {
            pressed: Some((PointerTarget::Handle(WidgetId::from(id)), Point::new(x, y))),
            pos: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    fn hover(x: f64, y: f64) -> PointerFrame {
        PointerFrame {
            pos: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn test_mouse_drag_produces_start_move_end() {
        let mut bridge = DragBridge::default();
        let now = Instant::now();

        assert!(bridge.step(press("timer-0", 100.0, 100.0), now).is_empty());
        assert!(bridge.is_tracking());
        assert!(bridge.step(hover(103.0, 100.0), now).is_empty());

        let events = bridge.step(hover(150.0, 80.0), now);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], DragEvent::Start { id: WidgetId::from("timer-0") });
        assert_eq!(events[1], DragEvent::Move { delta: Vec2::new(50.0, -20.0) });

        let release = PointerFrame {
            released: true,
            ..hover(150.0, 80.0)
        };
        let events = bridge.step(release, now);
        assert_eq!(
            events,
            vec![DragEvent::End {
                id: WidgetId::from("timer-0"),
                delta: Vec2::new(50.0, -20.0),
            }]
        );
        assert!(!bridge.is_tracking());
    }

    #[test]
    fn test_press_on_control_never_drags() {
        let mut bridge = DragBridge::default();
        let now = Instant::now();
        let frame = PointerFrame {
            pressed: Some((PointerTarget::Control, Point::new(10.0, 10.0))),
            pos: Some(Point::new(10.0, 10.0)),
            ..Default::default()
        };
        assert!(bridge.step(frame, now).is_empty());
        assert!(bridge.step(hover(200.0, 200.0), now).is_empty());
        assert!(!bridge.is_tracking());
    }

    #[test]
    fn test_focus_loss_cancels() {
        let mut bridge = DragBridge::default();
        let now = Instant::now();
        bridge.step(press("picture-0", 0.0, 0.0), now);
        bridge.step(hover(40.0, 0.0), now);

        let lost = PointerFrame {
            focused: false,
            ..Default::default()
        };
        assert_eq!(bridge.step(lost, now), vec![DragEvent::Cancel]);
        assert!(!bridge.is_tracking());
    }

    #[test]
    fn test_touch_hold_activates_on_poll() {
        let mut bridge = DragBridge::default();
        let start = Instant::now();
        let frame = PointerFrame {
            touch: true,
            ..press("groups-0", 50.0, 50.0)
        };
        assert!(bridge.step(frame, start).is_empty());

        let held = PointerFrame {
            touch: true,
            ..hover(50.0, 50.0)
        };
        let events = bridge.step(held, start + Duration::from_millis(300));
        assert_eq!(events, vec![DragEvent::Start { id: WidgetId::from("groups-0") }]);
    }
}
