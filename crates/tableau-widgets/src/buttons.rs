//! Button components: icon buttons and neobrutalist push buttons.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, Image, ImageSource, Rect, Sense, Stroke, StrokeKind,
    Ui, Vec2, vec2,
};

use crate::palette::Palette;
use crate::sizing;

/// Style configuration for icon buttons.
#[derive(Clone)]
struct IconButtonStyle {
    /// Button size
    pub size: Vec2,
    /// Icon size (should be smaller than button size)
    pub icon_size: Vec2,
    /// Corner radius
    pub corner_radius: u8,
    /// Draw the heavy border and offset shadow
    pub outlined: bool,
}

impl Default for IconButtonStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::MEDIUM, sizing::MEDIUM),
            icon_size: vec2(16.0, 16.0),
            corner_radius: sizing::CORNER_RADIUS,
            outlined: true,
        }
    }
}

impl IconButtonStyle {
    /// Flat 24x24 button for card title bars.
    fn small() -> Self {
        Self {
            size: vec2(24.0, 24.0),
            icon_size: vec2(14.0, 14.0),
            corner_radius: sizing::CORNER_RADIUS,
            outlined: false,
        }
    }
}

/// An icon button that displays an image/SVG.
pub struct IconButton<'a> {
    icon: ImageSource<'a>,
    tooltip: &'a str,
    selected: bool,
    enabled: bool,
    style: IconButtonStyle,
}

impl<'a> IconButton<'a> {
    /// Create a new icon button.
    pub fn new(icon: ImageSource<'a>, tooltip: &'a str) -> Self {
        Self {
            icon,
            tooltip,
            selected: false,
            enabled: true,
            style: IconButtonStyle::default(),
        }
    }

    /// Set whether the button is selected/active.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Use the flat title-bar style.
    pub fn small(mut self) -> Self {
        self.style = IconButtonStyle::small();
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let palette = Palette::of(ui);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(self.style.size, sense);

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(self.style.corner_radius);
            let bg_color = if self.selected {
                palette.accent
            } else if response.hovered() && self.enabled {
                palette.hover_bg
            } else if self.style.outlined {
                palette.surface
            } else {
                Color32::TRANSPARENT
            };

            let rect = pressed_offset(rect, response.is_pointer_button_down_on());
            if self.style.outlined {
                ui.painter()
                    .rect_filled(rect.translate(vec2(2.0, 2.0)), radius, palette.shadow);
            }
            ui.painter().rect_filled(rect, radius, bg_color);
            if self.style.outlined {
                ui.painter().rect_stroke(
                    rect,
                    radius,
                    Stroke::new(sizing::BORDER_WIDTH, palette.border),
                    StrokeKind::Inside,
                );
            }

            let tint = if self.enabled {
                palette.text
            } else {
                palette.text_muted.gamma_multiply(0.6)
            };
            let icon_rect = Rect::from_center_size(rect.center(), self.style.icon_size);
            Image::new(self.icon)
                .fit_to_exact_size(self.style.icon_size)
                .tint(tint)
                .paint_at(ui, icon_rect);
        }

        let clicked = self.enabled && response.clicked();
        let response = response.on_hover_text(self.tooltip);
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}

/// A push button with a text label, heavy border and offset shadow.
pub struct TextButton<'a> {
    label: &'a str,
    fill: Option<Color32>,
    enabled: bool,
    min_width: Option<f32>,
    height: f32,
    font_size: f32,
}

impl<'a> TextButton<'a> {
    /// Create a new text button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            fill: None,
            enabled: true,
            min_width: None,
            height: 30.0,
            font_size: 13.0,
        }
    }

    /// Background color (defaults to the surface color).
    pub fn fill(mut self, color: Color32) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the button height.
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the font size.
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let palette = Palette::of(ui);
        let font_id = egui::FontId::proportional(self.font_size);
        let galley = ui.painter().layout_no_wrap(
            self.label.to_string(),
            font_id.clone(),
            Color32::PLACEHOLDER, // Color doesn't matter for sizing
        );
        let text_width = galley.size().x + 24.0;
        let width = self.min_width.unwrap_or(text_width).max(text_width);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(vec2(width, self.height), sense);

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            let fill = self.fill.unwrap_or(palette.surface);
            let (fill, text_color) = if self.enabled {
                (fill, palette.text)
            } else {
                (fill.gamma_multiply(0.45), palette.text_muted)
            };

            let pressed = self.enabled && response.is_pointer_button_down_on();
            if self.enabled && !pressed {
                ui.painter()
                    .rect_filled(rect.translate(vec2(2.0, 2.0)), radius, palette.shadow);
            }
            let rect = pressed_offset(rect, pressed);
            ui.painter().rect_filled(rect, radius, fill);
            ui.painter().rect_stroke(
                rect,
                radius,
                Stroke::new(sizing::BORDER_WIDTH, palette.border),
                StrokeKind::Inside,
            );
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = self.enabled && response.clicked();
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}

/// Shift a pressed button onto its shadow.
fn pressed_offset(rect: Rect, pressed: bool) -> Rect {
    if pressed { rect.translate(vec2(2.0, 2.0)) } else { rect }
}
