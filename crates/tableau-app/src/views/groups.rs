//! Group maker card: pick students, choose a size, shuffle, then move
//! students between groups by drag and drop.

use egui::{CornerRadius, Frame, Margin, RichText, Stroke, Ui, vec2};
use tableau_core::directory::QueryState;
use tableau_core::WidgetKind;
use tableau_widgets::{Card, CardPart, IconButton, Palette, TextButton, section_label, sizing};

use super::{ViewCx, WidgetResponse, auto_width};
use crate::board::GroupsWidget;
use crate::icons;

const CONTENT_WIDTH: f64 = 480.0;
const GROUP_CARD_WIDTH: f32 = 140.0;

/// Load state of the user directory, as the group cards show it.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterStatus {
    Loading,
    Failed(String),
    Ready,
}

impl RosterStatus {
    pub fn from_query<T>(state: QueryState<'_, T>) -> Self {
        if state.data.is_some() {
            RosterStatus::Ready
        } else if let Some(err) = state.error {
            RosterStatus::Failed(err.to_string())
        } else {
            RosterStatus::Loading
        }
    }
}

/// A student being dragged out of a group.
#[derive(Debug, Clone, Copy)]
struct StudentDrag {
    student: u32,
    from: usize,
}

pub(super) fn show(ui: &mut Ui, widget: &mut GroupsWidget, cx: &mut ViewCx<'_>) -> WidgetResponse {
    let card = Card::new(WidgetKind::Groups.layout().title, auto_width(WidgetKind::Groups, CONTENT_WIDTH))
        .grip(icons::grip())
        .lifted(cx.lifted);
    let mut refetch_users = false;
    let roster = cx.roster;

    let shown = card.show(ui, |part, ui| match part {
        CardPart::Actions => {
            if widget.maker.is_created()
                && IconButton::new(icons::shuffle(), "Nouveau tirage").small().show(ui)
            {
                widget.maker.create(cx.rng);
            }
        }
        CardPart::Body => match roster {
            RosterStatus::Loading if widget.maker.students().is_empty() => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Chargement des utilisateurs...");
                });
            }
            RosterStatus::Failed(err) if widget.maker.students().is_empty() => {
                let palette = Palette::of(ui);
                ui.label(
                    RichText::new("Erreur lors du chargement des utilisateurs")
                        .color(palette.chart(2))
                        .strong(),
                );
                ui.label(RichText::new(err.as_str()).size(11.0).color(palette.text_muted));
                ui.add_space(6.0);
                size_input(ui, widget);
                ui.add_space(6.0);
                if TextButton::new("Réessayer").show(ui) {
                    refetch_users = true;
                }
            }
            _ if widget.maker.is_created() => created_view(ui, widget, cx),
            _ => setup_view(ui, widget, cx),
        },
    });

    WidgetResponse {
        grip: shown.grip,
        refetch_users,
    }
}

fn size_input(ui: &mut Ui, widget: &mut GroupsWidget) {
    let response = ui.add(
        egui::TextEdit::singleline(&mut widget.size_input)
            .hint_text("Taille des groupes")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        widget.maker.set_group_size_input(&widget.size_input);
    }
}

fn selection_summary(widget: &GroupsWidget) -> String {
    let maker = &widget.maker;
    match maker.selected_count() {
        0 => "Sélectionner des utilisateurs...".to_string(),
        _ if maker.all_selected() => "Tous sélectionnés".to_string(),
        1 => "1 sélectionné".to_string(),
        n => format!("{n} sélectionnés"),
    }
}

fn setup_view(ui: &mut Ui, widget: &mut GroupsWidget, cx: &mut ViewCx<'_>) {
    let palette = Palette::of(ui);
    egui::CollapsingHeader::new(selection_summary(widget))
        .id_salt("group_students")
        .show(ui, |ui| {
            let maker = &mut widget.maker;
            let mut all = maker.all_selected();
            let label = if all { "Désélectionner tout" } else { "Sélectionner tout" };
            let indeterminate = maker.some_selected() && !all;
            if ui
                .add(egui::Checkbox::new(&mut all, label).indeterminate(indeterminate))
                .changed()
            {
                maker.toggle_all();
            }
            ui.separator();
            egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                let students: Vec<(u32, String)> =
                    maker.students().iter().map(|s| (s.id, s.name.clone())).collect();
                for (id, name) in students {
                    let mut selected = maker.is_selected(id);
                    if ui.checkbox(&mut selected, name).changed() {
                        maker.toggle_student(id);
                    }
                }
            });
        });

    ui.add_space(8.0);
    size_input(ui, widget);
    ui.add_space(8.0);

    if TextButton::new("Créer les groupes")
        .fill(palette.accent)
        .enabled(widget.maker.can_create())
        .show(ui)
    {
        widget.maker.create(cx.rng);
    }
}

fn created_view(ui: &mut Ui, widget: &mut GroupsWidget, cx: &mut ViewCx<'_>) {
    let palette = Palette::of(ui);
    let mut moved: Option<(StudentDrag, usize)> = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = vec2(10.0, 10.0);
        for (index, group) in widget.maker.groups().iter().enumerate() {
            let frame = Frame::new()
                .fill(palette.chart(index).gamma_multiply(0.35))
                .stroke(Stroke::new(sizing::BORDER_WIDTH, palette.border))
                .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
                .inner_margin(Margin::same(8));
            let (_, dropped) = ui.dnd_drop_zone::<StudentDrag, _>(frame, |ui| {
                ui.set_width(GROUP_CARD_WIDTH);
                section_label(ui, &format!("Groupe {}", index + 1));
                for student in group {
                    let payload = StudentDrag {
                        student: student.id,
                        from: index,
                    };
                    let id = ui.id().with(("student", student.id));
                    ui.dnd_drag_source(id, payload, |ui| {
                        ui.label(RichText::new(&student.name).size(13.0));
                    });
                }
            });
            if let Some(payload) = dropped {
                moved = Some((*payload, index));
            }
        }
    });

    if let Some((drag, to)) = moved {
        if widget.maker.move_student(drag.student, drag.from, to) {
            log::debug!("Moved student {} from group {} to {}", drag.student, drag.from + 1, to + 1);
        }
    }

    ui.add_space(10.0);
    if TextButton::new("Reset").show(ui) {
        widget.maker.reset(cx.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_core::DirectoryError;

    #[test]
    fn test_roster_status_from_query() {
        let users: Vec<u32> = vec![1, 2];
        let loading: QueryState<'_, Vec<u32>> = QueryState {
            data: None,
            is_loading: true,
            error: None,
        };
        assert_eq!(RosterStatus::from_query(loading), RosterStatus::Loading);

        let err = DirectoryError::Status(500);
        let failed = QueryState {
            data: None::<&Vec<u32>>,
            is_loading: false,
            error: Some(&err),
        };
        assert!(matches!(RosterStatus::from_query(failed), RosterStatus::Failed(_)));

        let ready = QueryState {
            data: Some(&users),
            is_loading: false,
            error: None,
        };
        assert_eq!(RosterStatus::from_query(ready), RosterStatus::Ready);
    }

    #[test]
    fn test_selection_summary() {
        let mut widget = GroupsWidget::default();
        assert_eq!(selection_summary(&widget), "Sélectionner des utilisateurs...");
        widget.maker.set_students(vec![
            tableau_core::widgets::Student { id: 1, name: "Ada".into() },
            tableau_core::widgets::Student { id: 2, name: "Alan".into() },
        ]);
        widget.maker.toggle_student(1);
        assert_eq!(selection_summary(&widget), "1 sélectionné");
        widget.maker.toggle_student(2);
        assert_eq!(selection_summary(&widget), "Tous sélectionnés");
    }
}
