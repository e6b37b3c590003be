//! Countdown timer card.

use egui::{Align, CornerRadius, Key, Layout, RichText, Sense, Ui, vec2};
use tableau_core::WidgetKind;
use tableau_core::widgets::{QUICK_ADJUSTMENTS, Urgency};
use tableau_widgets::{Card, CardPart, IconButton, Palette, TextButton, section_label, sizing};

use super::{ViewCx, WidgetResponse, auto_width};
use crate::board::TimerWidget;
use crate::icons;

const CONTENT_WIDTH: f64 = 320.0;

pub(super) fn show(ui: &mut Ui, widget: &mut TimerWidget, cx: &mut ViewCx<'_>) -> WidgetResponse {
    let layout = WidgetKind::Timer.layout();
    let card = Card::new(layout.title, auto_width(WidgetKind::Timer, CONTENT_WIDTH))
        .grip(icons::grip())
        .lifted(cx.lifted);

    let shown = card.show(ui, |part, ui| match part {
        CardPart::Actions => {
            let timer = &mut widget.timer;
            let (icon, tip) = if timer.controls_visible() {
                (icons::eye_off(), "Masquer les contrôles")
            } else {
                (icons::eye(), "Afficher les contrôles")
            };
            if IconButton::new(icon, tip).small().show(ui) {
                timer.toggle_controls();
            }
        }
        CardPart::Body => body(ui, widget, cx),
    });

    WidgetResponse {
        grip: shown.grip,
        ..Default::default()
    }
}

fn body(ui: &mut Ui, widget: &mut TimerWidget, cx: &ViewCx<'_>) {
    let palette = Palette::of(ui);
    ui.vertical_centered(|ui| {
        if widget.editing {
            minutes_editor(ui, widget);
        } else {
            readout(ui, widget, palette);
        }

        if widget.timer.controls_visible() {
            ui.add_space(10.0);
            controls(ui, widget, cx, palette);
        }

        if widget.timer.quick_buttons_visible() {
            ui.add_space(10.0);
            quick_buttons(ui, widget, palette);
        }
    });
}

/// Big `MM:SS`. Click to edit, right-click for the menu.
fn readout(ui: &mut Ui, widget: &mut TimerWidget, palette: &Palette) {
    let color = match widget.timer.urgency() {
        Urgency::Calm => palette.chart(0),
        Urgency::Warning => palette.chart(1),
        Urgency::Critical => palette.chart(2),
    };
    let text = RichText::new(widget.timer.formatted())
        .size(64.0)
        .strong()
        .color(color);
    let response = ui
        .add(egui::Label::new(text).selectable(false).sense(Sense::click()))
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .on_hover_text("Cliquez pour modifier");
    if response.clicked() {
        widget.minutes_input = widget.timer.minutes_text();
        widget.editing = true;
    }

    response.context_menu(|ui| {
        let quick = if widget.timer.quick_buttons_visible() {
            "Masquer ajouts rapides"
        } else {
            "Afficher ajouts rapides"
        };
        if ui.button(quick).clicked() {
            widget.timer.toggle_quick_buttons();
            ui.close();
        }
        ui.separator();
        if ui.button("Réinitialiser").clicked() {
            widget.timer.reset();
            ui.close();
        }
        ui.separator();
        let controls = if widget.timer.controls_visible() {
            "Masquer les contrôles"
        } else {
            "Afficher les contrôles"
        };
        if ui.button(controls).clicked() {
            widget.timer.toggle_controls();
            ui.close();
        }
    });
}

/// Minutes field. Enter or leaving the field applies, Escape cancels.
fn minutes_editor(ui: &mut Ui, widget: &mut TimerWidget) {
    ui.horizontal(|ui| {
        let edit = egui::TextEdit::singleline(&mut widget.minutes_input)
            .hint_text("Min")
            .desired_width(80.0)
            .font(egui::FontId::proportional(28.0))
            .horizontal_align(Align::Center);
        let response = ui.add(edit);
        ui.label("minutes");

        if !response.has_focus() && !response.lost_focus() {
            response.request_focus();
        }
        if response.lost_focus() {
            if !ui.input(|i| i.key_pressed(Key::Escape)) {
                widget.timer.set_minutes(&widget.minutes_input);
            }
            widget.editing = false;
            widget.minutes_input.clear();
        }
    });
}

fn controls(ui: &mut Ui, widget: &mut TimerWidget, cx: &ViewCx<'_>, palette: &Palette) {
    ui.horizontal(|ui| {
        let timer = &mut widget.timer;
        let label = if timer.is_running() { "Pause" } else { "Start" };
        if TextButton::new(label)
            .fill(palette.chart(0))
            .enabled(timer.can_toggle())
            .min_width(90.0)
            .show(ui)
        {
            timer.toggle(cx.now);
        }

        if TextButton::new("Reset").min_width(90.0).show(ui) {
            timer.reset();
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if IconButton::new(icons::sliders(), "Ajouts rapides")
                .selected(timer.quick_buttons_visible())
                .show(ui)
            {
                timer.toggle_quick_buttons();
            }
        });
    });
}

fn quick_buttons(ui: &mut Ui, widget: &mut TimerWidget, palette: &Palette) {
    egui::Frame::new()
        .fill(palette.background)
        .stroke(egui::Stroke::new(sizing::BORDER_WIDTH, palette.border))
        .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                section_label(ui, "Ajouts rapides");
                ui.spacing_mut().item_spacing = vec2(8.0, 8.0);
                let (adds, removes): (Vec<i64>, Vec<i64>) =
                    QUICK_ADJUSTMENTS.into_iter().partition(|s| *s > 0);
                for (row, color) in [(adds, palette.chart(0)), (removes, palette.chart(2))] {
                    ui.horizontal(|ui| {
                        for seconds in row {
                            let label = format!("{:+}min", seconds / 60);
                            if TextButton::new(&label)
                                .fill(color)
                                .height(24.0)
                                .font_size(11.0)
                                .enabled(widget.timer.can_adjust(seconds))
                                .show(ui)
                            {
                                widget.timer.add_time(seconds);
                            }
                        }
                    });
                }
            });
        });
}
