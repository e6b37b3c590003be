//! egui views of the canvas widgets.
//!
//! Each view draws one widget card from its [`WidgetState`] and mutates that
//! state directly. Dragging is not handled here: a view only reports the
//! response of its grip so the canvas can feed presses to the drag sensor.

mod clock;
mod groups;
mod instruction;
mod media;
mod timer;

pub use clock::{clock_lines, show_clock};
pub use groups::RosterStatus;

use egui::{Response, Ui};
use rand::rngs::StdRng;
use tableau_core::{AppState, WidgetId, WidgetKind};
use tableau_widgets::CardWidth;

use crate::board::WidgetState;
use crate::loader::MediaLoader;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// What a view may touch besides its own state.
pub struct ViewCx<'a> {
    pub app_state: &'a mut AppState,
    pub rng: &'a mut StdRng,
    pub loader: &'a MediaLoader,
    pub roster: &'a RosterStatus,
    /// Page host, for embed URLs.
    pub host: &'a str,
    /// The widget is being dragged.
    pub lifted: bool,
    pub now: Instant,
}

/// What a view reported this frame.
#[derive(Default)]
pub struct WidgetResponse {
    /// Grip of an item card.
    pub grip: Option<Response>,
    /// The user asked to reload the user directory.
    pub refetch_users: bool,
}

/// Draw the card of one widget.
pub fn show_widget(ui: &mut Ui, id: &WidgetId, state: &mut WidgetState, cx: &mut ViewCx<'_>) -> WidgetResponse {
    match state {
        WidgetState::Instruction(editor) => instruction::show(ui, editor, cx),
        WidgetState::Timer(widget) => timer::show(ui, widget, cx),
        WidgetState::Picture(widget) => media::show_picture(ui, id, widget, cx),
        WidgetState::Video(widget) => media::show_video(ui, id, widget, cx),
        WidgetState::Groups(widget) => groups::show(ui, widget, cx),
    }
}

/// Card width of an auto-sized widget whose content wants `content` pixels.
fn auto_width(kind: WidgetKind, content: f64) -> CardWidth {
    let (min, max) = kind.layout().width.resolve(content);
    CardWidth::new(min as f32, max as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_width_clamps_content() {
        assert_eq!(auto_width(WidgetKind::Timer, 120.0), CardWidth::exact(200.0));
        assert_eq!(auto_width(WidgetKind::Instruction, 5000.0), CardWidth::exact(1300.0));
        assert_eq!(auto_width(WidgetKind::Groups, 480.0), CardWidth::exact(480.0));
    }
}
