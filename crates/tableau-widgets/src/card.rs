//! Widget cards: the bordered box every canvas widget lives in.
//!
//! A card is a title bar (optional grip, title, trailing actions) over a body.
//! The grip is returned as a [`Response`] so the caller can feed its pointer
//! state to the drag sensor; everything else inside the card keeps its own
//! interactions.

use egui::{
    Align2, CornerRadius, CursorIcon, FontId, Frame, Image, ImageSource, Margin, Rect, Response,
    Sense, Stroke, Ui, vec2,
};

use crate::palette::Palette;
use crate::sizing;

/// Horizontal extent a card may take, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardWidth {
    pub min: f32,
    pub max: f32,
}

impl CardWidth {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max: max.max(min) }
    }

    /// Same minimum and maximum.
    pub fn exact(width: f32) -> Self {
        Self::new(width, width)
    }
}

/// Frame of a card at rest or while lifted.
pub fn card_frame(palette: &Palette, lifted: bool) -> Frame {
    Frame::new()
        .fill(palette.surface)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(
            if lifted { sizing::BORDER_WIDTH + 1.0 } else { sizing::BORDER_WIDTH },
            palette.border,
        ))
        .inner_margin(Margin::same(0))
}

/// Which part of the card a content callback is filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPart {
    /// Right side of the title bar, laid out right to left.
    Actions,
    /// Content below the title bar.
    Body,
}

/// What a card reported this frame.
pub struct CardResponse {
    /// Grip handle and title, when a grip was drawn.
    pub grip: Option<Response>,
    /// The whole card.
    pub response: Response,
}

/// Card builder.
pub struct Card<'a> {
    title: &'a str,
    grip_icon: Option<ImageSource<'a>>,
    width: CardWidth,
    lifted: bool,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, width: CardWidth) -> Self {
        Self {
            title,
            grip_icon: None,
            width,
            lifted: false,
        }
    }

    /// Draw a grip handle at the left of the title bar.
    pub fn grip(mut self, icon: ImageSource<'a>) -> Self {
        self.grip_icon = Some(icon);
        self
    }

    /// Thicker border while the card is being dragged.
    pub fn lifted(mut self, lifted: bool) -> Self {
        self.lifted = lifted;
        self
    }

    /// Show the card. `content` is called once for the title bar actions and
    /// once for the body.
    pub fn show(self, ui: &mut Ui, mut content: impl FnMut(CardPart, &mut Ui)) -> CardResponse {
        let palette = Palette::of(ui);
        let has_grip = self.grip_icon.is_some();
        let inner = card_frame(palette, self.lifted).show(ui, |ui| {
            ui.set_min_width(self.width.min);
            ui.set_max_width(self.width.max);

            let grip = Frame::new()
                .inner_margin(Margin::symmetric(6, 4))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let grip = self.grip_icon.map(|icon| grip_handle(ui, icon, palette));
                        let title = egui::RichText::new(self.title)
                            .size(13.0)
                            .strong()
                            .color(palette.text);
                        let sense = if has_grip { Sense::drag() } else { Sense::hover() };
                        let title = ui.add(egui::Label::new(title).selectable(false).sense(sense));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            content(CardPart::Actions, ui)
                        });
                        grip.map(|grip| grip.union(title.on_hover_cursor(CursorIcon::Grab)))
                    })
                    .inner
                })
                .inner;

            let rect = ui.available_rect_before_wrap();
            ui.painter().hline(
                rect.x_range(),
                rect.top(),
                Stroke::new(sizing::BORDER_WIDTH, palette.border),
            );

            Frame::new()
                .inner_margin(Margin::same(10))
                .show(ui, |ui| content(CardPart::Body, ui));
            grip
        });
        CardResponse {
            grip: inner.inner,
            response: inner.response,
        }
    }
}

fn grip_handle(ui: &mut Ui, icon: ImageSource<'_>, palette: &Palette) -> Response {
    let (rect, response) = ui.allocate_exact_size(vec2(20.0, 24.0), Sense::drag());
    if ui.is_rect_visible(rect) {
        let tint = if response.hovered() || response.dragged() {
            palette.accent
        } else {
            palette.text_muted
        };
        let icon_rect = Rect::from_center_size(rect.center(), vec2(14.0, 14.0));
        Image::new(icon)
            .fit_to_exact_size(vec2(14.0, 14.0))
            .tint(tint)
            .paint_at(ui, icon_rect);
    }
    response.on_hover_cursor(CursorIcon::Grab)
}

/// Placeholder drawn in an empty media card.
pub fn empty_slot(ui: &mut Ui, size: egui::Vec2, text: &str) -> Response {
    let palette = Palette::of(ui);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    if ui.is_rect_visible(rect) {
        let stroke = Stroke::new(1.5, palette.text_muted.gamma_multiply(0.6));
        let radius = CornerRadius::same(sizing::CORNER_RADIUS);
        let fill = if response.hovered() { palette.hover_bg } else { palette.background };
        ui.painter().rect_filled(rect, radius, fill);
        ui.painter()
            .rect_stroke(rect, radius, stroke, egui::StrokeKind::Inside);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(13.0),
            palette.text_muted,
        );
    }
    response.on_hover_cursor(CursorIcon::PointingHand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_width_orders_bounds() {
        let width = CardWidth::new(500.0, 300.0);
        assert_eq!(width.min, 500.0);
        assert_eq!(width.max, 500.0);
        assert_eq!(CardWidth::exact(320.0), CardWidth::new(320.0, 320.0));
    }
}
