//! Canvas controller: owns widget positions and drives drags.

use std::collections::HashMap;

use kurbo::{Point, Rect, Size, Vec2};

use crate::bounds::BoundsPolicy;
use crate::drag::{DragEvent, DragSession};
use crate::position::{PositionStore, WidgetId};
use crate::tools::{ToolRegistry, WidgetDescriptor, WidgetKind};

/// Canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    /// Region dragged widgets are kept inside.
    pub bounds: BoundsPolicy,
    /// Initial viewport size in logical pixels.
    pub viewport: Size,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            bounds: BoundsPolicy::Viewport,
            viewport: Size::new(1280.0, 800.0),
        }
    }
}

impl CanvasConfig {
    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }
}

/// What a drag event did to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The event did not apply to the current state.
    Ignored,
    /// A drag started on this widget.
    Started(WidgetId),
    /// The live delta of the active drag changed.
    Moved,
    /// The drag ended and the widget was moved to `position`.
    Committed { id: WidgetId, position: Point },
    /// The drag was aborted; nothing was committed.
    Cancelled,
}

/// Root of the drag-and-drop subsystem.
///
/// The controller is the only writer of the [`PositionStore`]. Widgets read
/// their position through [`CanvasController::position`] (committed) or
/// [`CanvasController::visual_position`] (committed plus the bounded live
/// drag delta).
#[derive(Debug, Clone)]
pub struct CanvasController {
    config: CanvasConfig,
    registry: ToolRegistry,
    store: PositionStore,
    /// Last measured on-screen rectangle per widget.
    layouts: HashMap<WidgetId, Rect>,
    session: Option<DragSession>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            registry: ToolRegistry::new(),
            store: PositionStore::new(),
            layouts: HashMap::new(),
            session: None,
        }
    }

    /// Start from an existing widget list.
    pub fn with_registry(config: CanvasConfig, registry: ToolRegistry) -> Self {
        let store = PositionStore::from_descriptors(registry.descriptors());
        Self {
            config,
            registry,
            store,
            layouts: HashMap::new(),
            session: None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn set_bounds_policy(&mut self, bounds: BoundsPolicy) {
        self.config.bounds = bounds;
    }

    /// Update the viewport size (window resize).
    pub fn set_viewport(&mut self, size: Size) {
        self.config.viewport = size;
    }

    /// Viewport rectangle in canvas coordinates.
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.config.viewport)
    }

    /// Add a widget of `kind` and give it its initial position.
    pub fn add_tool(&mut self, kind: WidgetKind) -> WidgetId {
        let id = self.registry.add(kind).id.clone();
        self.store.reconcile(self.registry.descriptors());
        id
    }

    /// Mounted widgets in insertion order.
    pub fn widgets(&self) -> &[WidgetDescriptor] {
        self.registry.descriptors()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Read-only view of the committed positions.
    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    /// Ids whose committed position changed since the last call.
    pub fn take_changed(&mut self) -> Vec<WidgetId> {
        self.store.take_changed()
    }

    /// Committed position of `id`.
    pub fn position(&self, id: &WidgetId) -> Point {
        let initial = self
            .registry
            .get(id)
            .map(|d| d.initial_position)
            .unwrap_or(Point::ZERO);
        self.store.get(id, initial)
    }

    /// Where `id` should be drawn this frame.
    pub fn visual_position(&self, id: &WidgetId) -> Point {
        match &self.session {
            Some(session) if &session.active_id == id => self.resolve(session, session.delta),
            _ => self.position(id),
        }
    }

    /// Record the measured on-screen rectangle of a widget.
    pub fn record_layout(&mut self, id: &WidgetId, rect: Rect) {
        // The rect of the dragged widget is already captured in the session.
        if self.is_dragging(id) {
            return;
        }
        self.layouts.insert(id.clone(), rect);
    }

    /// Last measured rectangle of `id`.
    pub fn layout(&self, id: &WidgetId) -> Option<Rect> {
        self.layouts.get(id).copied()
    }

    pub fn is_dragging(&self, id: &WidgetId) -> bool {
        self.session.as_ref().is_some_and(|s| &s.active_id == id)
    }

    /// The active drag, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Widgets back to front; the dragged widget is always on top.
    pub fn paint_order(&self) -> Vec<&WidgetDescriptor> {
        let mut order: Vec<_> = self.registry.descriptors().iter().collect();
        if let Some(session) = &self.session {
            if let Some(index) = order.iter().position(|d| d.id == session.active_id) {
                let dragged = order.remove(index);
                order.push(dragged);
            }
        }
        order
    }

    /// Apply one drag event.
    pub fn handle(&mut self, event: DragEvent) -> DragOutcome {
        match event {
            DragEvent::Start { id } => {
                if self.session.is_some() {
                    log::debug!("Ignoring drag start on {} while another drag is active", id);
                    return DragOutcome::Ignored;
                }
                if self.registry.get(&id).is_none() {
                    log::warn!("Drag start on unknown widget {}", id);
                    return DragOutcome::Ignored;
                }
                let origin = self.position(&id);
                let origin_rect = self.layouts.get(&id).copied();
                log::debug!("Drag start on {} at ({}, {})", id, origin.x, origin.y);
                self.session = Some(DragSession::new(id.clone(), origin, origin_rect));
                DragOutcome::Started(id)
            }
            DragEvent::Move { delta } => match &mut self.session {
                Some(session) => {
                    session.delta = delta;
                    DragOutcome::Moved
                }
                None => DragOutcome::Ignored,
            },
            DragEvent::End { id, delta } => {
                let Some(session) = self.session.take_if(|s| s.active_id == id) else {
                    log::debug!("Ignoring drag end on {}", id);
                    return DragOutcome::Ignored;
                };
                let position = self.resolve(&session, delta);
                // Keep the measured rect in step with the commit until the next frame re-measures it.
                if let Some(rect) = session.origin_rect {
                    self.layouts
                        .insert(id.clone(), rect + (position - session.origin));
                }
                self.store.set(id.clone(), position);
                log::info!("Moved {} to ({}, {})", id, position.x, position.y);
                DragOutcome::Committed { id, position }
            }
            DragEvent::Cancel => match self.session.take() {
                Some(session) => {
                    log::debug!("Drag on {} cancelled", session.active_id);
                    DragOutcome::Cancelled
                }
                None => DragOutcome::Ignored,
            },
        }
    }

    /// Origin plus the bounded `delta`.
    fn resolve(&self, session: &DragSession, delta: Vec2) -> Point {
        let bounded = self
            .config
            .bounds
            .apply(delta, Some(session.bounding_rect()), self.viewport());
        session.origin + bounded
    }
}
