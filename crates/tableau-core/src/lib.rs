//! Tableau Core Library
//!
//! Platform-agnostic state and drag-and-drop logic for the Tableau classroom
//! whiteboard: where widgets sit, how drags move them, and the state machines
//! behind each widget.

pub mod app_state;
pub mod bounds;
pub mod canvas;
pub mod directory;
pub mod drag;
pub mod position;
pub mod sensor;
pub mod tools;
pub mod widgets;

pub use app_state::{AppState, Theme};
pub use bounds::{BoundsPolicy, restrict_to_region};
pub use canvas::{CanvasConfig, CanvasController, DragOutcome};
pub use directory::{
    DirectoryClient, DirectoryError, DirectoryEvent, QueryCache, QueryOptions, QueryState, User, UserDirectory,
};
pub use drag::{DragEvent, DragSession};
pub use position::{PositionStore, WidgetId};
pub use sensor::{DragSensor, PointerInput, PointerKind, PointerTarget, SensorConfig};
pub use tools::{
    DragVariant, ToolCategory, ToolRegistry, WidgetDescriptor, WidgetKind, WidgetLayout, WidthPolicy,
};
