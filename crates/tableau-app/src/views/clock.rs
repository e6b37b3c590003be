//! Wall clock in the bottom-right corner.

use chrono::{DateTime, Local, TimeZone};
use egui::{Align2, Context, RichText, Vec2};
use tableau_widgets::{Palette, panel_frame};

/// Date line (`Monday 19 October 2026`) and time line (`14:05:09`).
pub fn clock_lines<Tz: TimeZone>(now: &DateTime<Tz>) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    (
        now.format("%A %-d %B %Y").to_string(),
        now.format("%H:%M:%S").to_string(),
    )
}

pub fn show_clock(ctx: &Context, palette: &Palette) {
    let (date, time) = clock_lines(&Local::now());
    egui::Area::new(egui::Id::new("clock"))
        .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-16.0, -16.0))
        .interactable(false)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame(palette).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(date).size(13.0).color(palette.text_muted));
                    ui.label(
                        RichText::new(time)
                            .size(28.0)
                            .strong()
                            .monospace()
                            .color(palette.text),
                    );
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_clock_lines() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 9).single().expect("valid date");
        let (date, time) = clock_lines(&now);
        assert_eq!(date, "Monday 19 October 2026");
        assert_eq!(time, "08:05:09");
    }
}
