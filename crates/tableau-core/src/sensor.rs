//! Drag sensors: turn raw pointer input into drag events.
//!
//! A press only becomes a drag once it passes an activation constraint. Mouse
//! drags activate after the pointer travelled [`SensorConfig::pointer_distance`];
//! touch drags activate after the finger was held for
//! [`SensorConfig::touch_delay`] without moving further than
//! [`SensorConfig::touch_tolerance`]. Anything shorter stays a click or a
//! scroll and never reaches the canvas.

use std::time::Duration;

use kurbo::{Point, Vec2};

use crate::drag::DragEvent;
use crate::position::WidgetId;

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Activation constraints of the sensors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// Distance a mouse must travel before a drag starts.
    pub pointer_distance: f64,
    /// How long a touch must be held before a drag starts.
    pub touch_delay: Duration,
    /// Movement allowed during the touch hold.
    pub touch_tolerance: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            pointer_distance: 8.0,
            touch_delay: Duration::from_millis(250),
            touch_tolerance: 8.0,
        }
    }
}

impl SensorConfig {
    pub fn with_pointer_distance(mut self, distance: f64) -> Self {
        self.pointer_distance = distance;
        self
    }

    pub fn with_touch_delay(mut self, delay: Duration) -> Self {
        self.touch_delay = delay;
        self
    }

    pub fn with_touch_tolerance(mut self, tolerance: f64) -> Self {
        self.touch_tolerance = tolerance;
        self
    }
}

/// What kind of device produced the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// What was under the pointer when it went down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// The grab surface of a widget.
    Handle(WidgetId),
    /// An interactive control inside a widget (button, input, slider).
    Control,
}

/// Raw pointer input fed to the sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Down {
        target: PointerTarget,
        kind: PointerKind,
        pos: Point,
        at: Instant,
    },
    Move {
        pos: Point,
        at: Instant,
    },
    Up {
        pos: Point,
        at: Instant,
    },
    /// The window lost focus or the pointer capture was taken away.
    Lost,
}

#[derive(Debug, Clone, PartialEq)]
enum SensorState {
    Idle,
    Pending {
        id: WidgetId,
        kind: PointerKind,
        start: Point,
        since: Instant,
    },
    Active {
        id: WidgetId,
        start: Point,
    },
}

/// Combined mouse and touch sensor.
#[derive(Debug, Clone)]
pub struct DragSensor {
    config: SensorConfig,
    state: SensorState,
}

impl Default for DragSensor {
    fn default() -> Self {
        Self::new(SensorConfig::default())
    }
}

impl DragSensor {
    /// Create a sensor with the given activation constraints.
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            state: SensorState::Idle,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Whether a drag has been activated.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SensorState::Active { .. })
    }

    /// Whether a press is waiting for its activation constraint.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, SensorState::Pending { .. })
    }

    /// Widget of the pending or active gesture.
    pub fn target(&self) -> Option<&WidgetId> {
        match &self.state {
            SensorState::Idle => None,
            SensorState::Pending { id, .. } | SensorState::Active { id, .. } => Some(id),
        }
    }

    /// Feed one pointer input, returning the drag event it produced.
    pub fn handle(&mut self, input: PointerInput) -> Option<DragEvent> {
        match input {
            PointerInput::Down { target, kind, pos, at } => {
                if self.is_active() {
                    return None;
                }
                match target {
                    PointerTarget::Handle(id) => {
                        self.state = SensorState::Pending {
                            id,
                            kind,
                            start: pos,
                            since: at,
                        };
                    }
                    PointerTarget::Control => self.state = SensorState::Idle,
                }
                None
            }
            PointerInput::Move { pos, at } => self.on_move(pos, at),
            PointerInput::Up { pos, .. } => {
                match std::mem::replace(&mut self.state, SensorState::Idle) {
                    SensorState::Active { id, start } => Some(DragEvent::End { id, delta: pos - start }),
                    _ => None,
                }
            }
            PointerInput::Lost => match std::mem::replace(&mut self.state, SensorState::Idle) {
                SensorState::Active { .. } => Some(DragEvent::Cancel),
                _ => None,
            },
        }
    }

    /// Activate a touch that has been held long enough without moving.
    pub fn poll(&mut self, now: Instant) -> Option<DragEvent> {
        let SensorState::Pending {
            id,
            kind: PointerKind::Touch,
            start,
            since,
        } = &self.state
        else {
            return None;
        };
        if now.saturating_duration_since(*since) < self.config.touch_delay {
            return None;
        }
        let (id, start) = (id.clone(), *start);
        Some(self.activate(id, start))
    }

    fn on_move(&mut self, pos: Point, at: Instant) -> Option<DragEvent> {
        match &self.state {
            SensorState::Idle => None,
            SensorState::Active { start, .. } => Some(DragEvent::Move { delta: pos - *start }),
            SensorState::Pending { id, kind, start, since } => {
                let travelled = distance(pos - *start);
                match kind {
                    PointerKind::Mouse => {
                        if travelled >= self.config.pointer_distance {
                            let (id, start) = (id.clone(), *start);
                            return Some(self.activate(id, start));
                        }
                        None
                    }
                    PointerKind::Touch => {
                        if travelled > self.config.touch_tolerance {
                            log::debug!("Touch on {} moved before activation, aborting", id);
                            self.state = SensorState::Idle;
                            return None;
                        }
                        if at.saturating_duration_since(*since) >= self.config.touch_delay {
                            let (id, start) = (id.clone(), *start);
                            return Some(self.activate(id, start));
                        }
                        None
                    }
                }
            }
        }
    }

    fn activate(&mut self, id: WidgetId, start: Point) -> DragEvent {
        log::debug!("Drag activated on {}", id);
        self.state = SensorState::Active { id: id.clone(), start };
        DragEvent::Start { id }
    }
}

fn distance(v: Vec2) -> f64 {
    v.hypot()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(kind: PointerKind, x: f64, y: f64, at: Instant) -> PointerInput {
        PointerInput::Down {
            target: PointerTarget::Handle(WidgetId::new("timer-0")),
            kind,
            pos: Point::new(x, y),
            at,
        }
    }

    #[test]
    fn test_mouse_needs_distance() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        assert_eq!(sensor.handle(down(PointerKind::Mouse, 100.0, 100.0, t0)), None);
        assert_eq!(
            sensor.handle(PointerInput::Move { pos: Point::new(105.0, 100.0), at: t0 }),
            None
        );
        assert_eq!(
            sensor.handle(PointerInput::Move { pos: Point::new(108.0, 100.0), at: t0 }),
            Some(DragEvent::Start { id: WidgetId::new("timer-0") })
        );
        assert_eq!(
            sensor.handle(PointerInput::Move { pos: Point::new(150.0, 80.0), at: t0 }),
            Some(DragEvent::Move { delta: Vec2::new(50.0, -20.0) })
        );
        assert_eq!(
            sensor.handle(PointerInput::Up { pos: Point::new(150.0, 80.0), at: t0 }),
            Some(DragEvent::End {
                id: WidgetId::new("timer-0"),
                delta: Vec2::new(50.0, -20.0)
            })
        );
        assert!(!sensor.is_active());
    }

    #[test]
    fn test_click_is_not_a_drag() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        sensor.handle(down(PointerKind::Mouse, 0.0, 0.0, t0));
        sensor.handle(PointerInput::Move { pos: Point::new(3.0, 3.0), at: t0 });
        assert_eq!(sensor.handle(PointerInput::Up { pos: Point::new(3.0, 3.0), at: t0 }), None);
        assert!(!sensor.is_pending());
    }

    #[test]
    fn test_control_press_never_drags() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        sensor.handle(PointerInput::Down {
            target: PointerTarget::Control,
            kind: PointerKind::Mouse,
            pos: Point::ZERO,
            at: t0,
        });
        assert_eq!(
            sensor.handle(PointerInput::Move { pos: Point::new(200.0, 0.0), at: t0 }),
            None
        );
        assert!(sensor.target().is_none());
    }

    #[test]
    fn test_touch_activates_after_delay() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        sensor.handle(down(PointerKind::Touch, 10.0, 10.0, t0));
        assert_eq!(sensor.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            sensor.poll(t0 + Duration::from_millis(250)),
            Some(DragEvent::Start { id: WidgetId::new("timer-0") })
        );
        assert!(sensor.is_active());
    }

    #[test]
    fn test_touch_moving_early_aborts() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        sensor.handle(down(PointerKind::Touch, 10.0, 10.0, t0));
        let at = t0 + Duration::from_millis(50);
        assert_eq!(sensor.handle(PointerInput::Move { pos: Point::new(30.0, 10.0), at }), None);
        assert!(!sensor.is_pending());
        assert_eq!(sensor.poll(t0 + Duration::from_millis(400)), None);
    }

    #[test]
    fn test_touch_within_tolerance_still_activates() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        sensor.handle(down(PointerKind::Touch, 10.0, 10.0, t0));
        let at = t0 + Duration::from_millis(300);
        assert_eq!(
            sensor.handle(PointerInput::Move { pos: Point::new(14.0, 10.0), at }),
            Some(DragEvent::Start { id: WidgetId::new("timer-0") })
        );
    }

    #[test]
    fn test_lost_cancels_active_drag() {
        let t0 = Instant::now();
        let mut sensor = DragSensor::default();
        sensor.handle(down(PointerKind::Mouse, 0.0, 0.0, t0));
        sensor.handle(PointerInput::Move { pos: Point::new(20.0, 0.0), at: t0 });
        assert_eq!(sensor.handle(PointerInput::Lost), Some(DragEvent::Cancel));
        assert_eq!(sensor.handle(PointerInput::Lost), None);
    }

    #[test]
    fn test_custom_config() {
        let config = SensorConfig::default().with_pointer_distance(2.0);
        let t0 = Instant::now();
        let mut sensor = DragSensor::new(config);
        sensor.handle(down(PointerKind::Mouse, 0.0, 0.0, t0));
        assert!(sensor.handle(PointerInput::Move { pos: Point::new(2.0, 0.0), at: t0 }).is_some());
    }
}
