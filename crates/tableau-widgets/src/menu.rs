//! Menu components: sidebar items, separators, panel frames.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Frame, Image, ImageSource, Margin, Pos2,
    Rect, Sense, Stroke, Ui, vec2,
};

use crate::palette::Palette;
use crate::sizing;

/// Show a sidebar entry with an icon and a label. Returns true if clicked.
pub fn menu_item(ui: &mut Ui, icon: ImageSource<'_>, label: &str) -> bool {
    let palette = Palette::of(ui);
    let size = vec2(ui.available_width(), 30.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            palette.hover_bg
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

        let icon_size = vec2(16.0, 16.0);
        let icon_rect = Rect::from_center_size(Pos2::new(rect.left() + 18.0, rect.center().y), icon_size);
        Image::new(icon)
            .fit_to_exact_size(icon_size)
            .tint(palette.text)
            .paint_at(ui, icon_rect);

        ui.painter().text(
            Pos2::new(rect.left() + 36.0, rect.center().y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(13.0),
            palette.text,
        );
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// Draw a menu separator line.
pub fn menu_separator(ui: &mut Ui) {
    let palette = Palette::of(ui);
    ui.add_space(4.0);
    let rect = ui.available_rect_before_wrap();
    let y = rect.top();
    ui.painter().line_segment(
        [Pos2::new(rect.left() + 8.0, y), Pos2::new(rect.right() - 8.0, y)],
        Stroke::new(1.0, palette.text_muted.gamma_multiply(0.3)),
    );
    ui.add_space(4.0);
}

/// Panel frame for floating menus and popups.
pub fn panel_frame(palette: &Palette) -> Frame {
    Frame::new()
        .fill(palette.surface)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(sizing::BORDER_WIDTH, palette.border))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 0,
            offset: [3, 3],
            color: palette.shadow,
        })
        .inner_margin(Margin::same(8))
}

/// Frame for the tool sidebar docked to the left edge.
pub fn sidebar_frame(palette: &Palette) -> Frame {
    Frame::new()
        .fill(palette.surface)
        .stroke(Stroke::new(sizing::BORDER_WIDTH, palette.border))
        .inner_margin(Margin::symmetric(8, 12))
}
