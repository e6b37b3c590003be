//! Instruction (consigne) card: a draft form, then the published text.

use egui::{RichText, Sense, Ui};
use tableau_core::WidgetKind;
use tableau_core::widgets::{InstructionEditor, MAX_WIDTH_SLIDER, MIN_WIDTH_SLIDER};
use tableau_widgets::{Card, CardPart, IconButton, Palette, TextButton, sizing};

use super::{ViewCx, WidgetResponse, auto_width};
use crate::icons;
use crate::platform;

/// Width of the draft form.
const FORM_WIDTH: f64 = 400.0;

pub(super) fn show(ui: &mut Ui, editor: &mut InstructionEditor, cx: &mut ViewCx<'_>) -> WidgetResponse {
    let published = cx.app_state.instruction_visible() && !cx.app_state.instruction().is_empty();
    let content = if published { editor.display_width() } else { FORM_WIDTH };
    let card = Card::new(WidgetKind::Instruction.layout().title, auto_width(WidgetKind::Instruction, content))
        .grip(icons::grip())
        .lifted(cx.lifted);

    let shown = card.show(ui, |part, ui| match part {
        CardPart::Actions => {
            if cx.app_state.instruction().is_empty() {
                return;
            }
            let (icon, tip) = if cx.app_state.instruction_visible() {
                (icons::pencil(), "Modifier la consigne")
            } else {
                (icons::eye(), "Afficher la consigne")
            };
            if IconButton::new(icon, tip).small().show(ui) {
                cx.app_state.toggle_visible();
            }
        }
        CardPart::Body if published => published_view(ui, editor, cx),
        CardPart::Body => draft_form(ui, editor, cx),
    });

    WidgetResponse {
        grip: shown.grip,
        ..Default::default()
    }
}

fn draft_form(ui: &mut Ui, editor: &mut InstructionEditor, cx: &mut ViewCx<'_>) {
    let palette = Palette::of(ui);
    let response = ui.add(
        egui::TextEdit::multiline(&mut editor.draft)
            .hint_text("Écrivez votre consigne ici...")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    ui.label(
        RichText::new("Entrez la consigne que vous souhaitez afficher")
            .size(12.0)
            .color(palette.text_muted),
    );
    ui.add_space(6.0);

    // Ctrl+Enter submits like the button.
    let shortcut = response.has_focus() && ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
    let clicked = TextButton::new("Soumettre")
        .fill(palette.accent)
        .enabled(!editor.draft.trim().is_empty())
        .show(ui);
    if (clicked || shortcut) && editor.submit(cx.app_state) {
        log::info!("Instruction published");
    }
}

fn published_view(ui: &mut Ui, editor: &mut InstructionEditor, cx: &mut ViewCx<'_>) {
    let palette = Palette::of(ui);
    let width = editor.display_width() as f32;
    ui.set_max_width(width);

    let text = RichText::new(cx.app_state.instruction()).size(28.0).color(palette.text);
    let response = ui.add(egui::Label::new(text).wrap().sense(Sense::click()));
    response.context_menu(|ui| {
        let slider = if editor.slider_visible() { "Masquer la taille" } else { "Ajuster la taille" };
        if ui.button(slider).clicked() {
            editor.toggle_slider();
            ui.close();
        }
        ui.separator();
        if ui.button("Réinitialiser").clicked() {
            editor.reset(cx.app_state);
            ui.close();
        }
        ui.separator();
        let buttons = if editor.buttons_visible() {
            "Masquer les boutons"
        } else {
            "Afficher les boutons"
        };
        if ui.button(buttons).clicked() {
            editor.toggle_buttons();
            ui.close();
        }
        ui.separator();
        if ui.button("Copier le texte").clicked() {
            if let Some(text) = InstructionEditor::clipboard_text(cx.app_state) {
                platform::copy_text(ui.ctx(), text);
            }
            ui.close();
        }
    });

    if editor.buttons_visible() {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if TextButton::new("Reset").show(ui) {
                editor.reset(cx.app_state);
            }
            let fill = if editor.slider_visible() { palette.accent } else { palette.surface };
            if TextButton::new("Taille").fill(fill).show(ui) {
                editor.toggle_slider();
            }
            if IconButton::new(icons::copy(), "Copier le texte").show(ui) {
                if let Some(text) = InstructionEditor::clipboard_text(cx.app_state) {
                    platform::copy_text(ui.ctx(), text);
                }
            }
        });
    }

    if editor.slider_visible() {
        ui.add_space(10.0);
        width_slider(ui, editor, palette);
    }
}

fn width_slider(ui: &mut Ui, editor: &mut InstructionEditor, palette: &Palette) {
    egui::Frame::new()
        .fill(palette.background)
        .stroke(egui::Stroke::new(sizing::BORDER_WIDTH, palette.border))
        .corner_radius(egui::CornerRadius::same(sizing::CORNER_RADIUS))
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Largeur:").size(12.0));
                ui.label(
                    RichText::new(format!("{}px", editor.display_width().round()))
                        .size(12.0)
                        .background_color(palette.accent),
                );
            });
            let mut value = editor.width_slider();
            let slider = egui::Slider::new(&mut value, MIN_WIDTH_SLIDER..=MAX_WIDTH_SLIDER).show_value(false);
            if ui.add(slider).changed() {
                editor.set_width_slider(value);
            }
            ui.horizontal(|ui| {
                ui.label(RichText::new("Étroit").size(10.0).color(palette.text_muted));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new("Large").size(10.0).color(palette.text_muted));
                });
            });
        });
}
