//! Light and dark palettes.
//!
//! Components look up the palette from the UI's dark-mode flag, so switching
//! the egui visuals is enough to re-theme every widget.

use egui::{Color32, Ui};

/// Colors of one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Canvas background.
    pub background: Color32,
    /// Card and panel fill.
    pub surface: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    /// Heavy card border.
    pub border: Color32,
    /// Hard offset shadow.
    pub shadow: Color32,
    /// Primary action / selection.
    pub accent: Color32,
    pub hover_bg: Color32,
    /// Chart colors: calm, warning, critical, then two extras.
    pub chart: [Color32; 5],
}

/// Light theme.
pub const LIGHT: Palette = Palette {
    background: Color32::from_rgb(238, 239, 233),
    surface: Color32::from_rgb(255, 255, 255),
    text: Color32::from_rgb(20, 20, 20),
    text_muted: Color32::from_rgb(110, 110, 110),
    border: Color32::from_rgb(0, 0, 0),
    shadow: Color32::from_rgb(0, 0, 0),
    accent: Color32::from_rgb(136, 170, 238),
    hover_bg: Color32::from_rgb(240, 240, 236),
    chart: [
        Color32::from_rgb(163, 230, 53),
        Color32::from_rgb(250, 204, 21),
        Color32::from_rgb(255, 102, 102),
        Color32::from_rgb(136, 170, 238),
        Color32::from_rgb(192, 132, 252),
    ],
};

/// Dark theme.
pub const DARK: Palette = Palette {
    background: Color32::from_rgb(39, 40, 48),
    surface: Color32::from_rgb(33, 33, 36),
    text: Color32::from_rgb(235, 235, 235),
    text_muted: Color32::from_rgb(160, 160, 165),
    border: Color32::from_rgb(0, 0, 0),
    shadow: Color32::from_rgb(0, 0, 0),
    accent: Color32::from_rgb(112, 148, 225),
    hover_bg: Color32::from_rgb(50, 50, 56),
    chart: [
        Color32::from_rgb(132, 204, 22),
        Color32::from_rgb(234, 179, 8),
        Color32::from_rgb(239, 68, 68),
        Color32::from_rgb(112, 148, 225),
        Color32::from_rgb(168, 85, 247),
    ],
};

impl Palette {
    /// Palette for a dark-mode flag.
    pub fn for_dark_mode(dark: bool) -> &'static Palette {
        if dark { &DARK } else { &LIGHT }
    }

    /// Palette matching the UI's current visuals.
    pub fn of(ui: &Ui) -> &'static Palette {
        Self::for_dark_mode(ui.visuals().dark_mode)
    }

    /// Chart color by index (wraps).
    pub fn chart(&self, index: usize) -> Color32 {
        self.chart[index % self.chart.len()]
    }

    /// egui visuals for this palette.
    pub fn visuals(&self, dark: bool) -> egui::Visuals {
        let mut visuals = if dark { egui::Visuals::dark() } else { egui::Visuals::light() };
        visuals.panel_fill = self.surface;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.override_text_color = Some(self.text);
        visuals.selection.bg_fill = self.accent;
        visuals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_dark_mode() {
        assert_eq!(Palette::for_dark_mode(false), &LIGHT);
        assert_eq!(Palette::for_dark_mode(true), &DARK);
    }

    #[test]
    fn test_chart_wraps() {
        assert_eq!(LIGHT.chart(5), LIGHT.chart(0));
    }

    #[test]
    fn test_visuals_follow_mode() {
        assert!(DARK.visuals(true).dark_mode);
        assert!(!LIGHT.visuals(false).dark_mode);
    }
}
