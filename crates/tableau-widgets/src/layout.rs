//! Layout helpers.

use egui::Ui;

use crate::palette::Palette;

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    let palette = Palette::of(ui);
    ui.label(egui::RichText::new(text).size(10.0).color(palette.text_muted));
}
