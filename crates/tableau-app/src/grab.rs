//! What a primary press on a widget card landed on.
//!
//! Wrapper cards grab from their whole surface, which lies under the card's
//! controls. egui hands a press on a control the click and gives the drag to
//! the surface below it, so the surface response alone reads as pressed even
//! when a button took the press.

use egui::{Context, Id, Pos2, Rect, Response, Sense, Ui};
use tableau_core::{PointerTarget, WidgetId};

/// Area holding the card of one widget at `pos`.
pub fn card_area(id: &WidgetId, pos: Pos2, lifted: bool) -> egui::Area {
    let order = if lifted { egui::Order::Foreground } else { egui::Order::Middle };
    egui::Area::new(Id::new(("widget", id.as_str())))
        .fixed_pos(pos)
        .constrain(false)
        .sense(Sense::hover())
        .order(order)
}

/// Register the grab surface of a Wrapper card.
///
/// Call before drawing the card so every control sits on top of it. Card
/// text is not selectable, so only real controls keep the press.
pub fn grab_surface(ui: &mut Ui, rect: Rect) -> Response {
    ui.style_mut().interaction.selectable_labels = false;
    ui.interact(rect, ui.id().with("surface"), Sense::drag())
        .on_hover_cursor(egui::CursorIcon::Grab)
}

/// Target of a primary press this frame over a Wrapper card's surface.
pub fn surface_press(ctx: &Context, id: &WidgetId, surface: &Response) -> Option<PointerTarget> {
    if !pressed_on(ctx, surface) {
        return None;
    }
    if control_under_pointer(ctx, surface) {
        Some(PointerTarget::Control)
    } else {
        Some(PointerTarget::Handle(id.clone()))
    }
}

/// Target of a primary press this frame over an Item card's grip.
pub fn grip_press(ctx: &Context, id: &WidgetId, grip: &Response) -> Option<PointerTarget> {
    pressed_on(ctx, grip).then(|| PointerTarget::Handle(id.clone()))
}

fn pressed_on(ctx: &Context, handle: &Response) -> bool {
    ctx.input(|i| i.pointer.primary_pressed())
        && (handle.is_pointer_button_down_on() || handle.hovered())
}

/// Another click or drag widget of the surface's layer is under the pointer.
fn control_under_pointer(ctx: &Context, surface: &Response) -> bool {
    let Some(pos) = ctx.input(|i| i.pointer.interact_pos()) else {
        return false;
    };
    let under: Vec<Id> = ctx.interaction_snapshot(|snapshot| {
        snapshot
            .contains_pointer
            .iter()
            .copied()
            .filter(|&widget| widget != surface.id)
            .collect()
    });
    under
        .into_iter()
        .filter_map(|widget| ctx.read_response(widget))
        .any(|response| {
            response.layer_id == surface.layer_id
                && response.enabled()
                && (response.sense.senses_click() || response.sense.senses_drag())
                && response.interact_rect.contains(pos)
        })
}
