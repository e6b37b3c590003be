//! Instruction (consigne) editor.

use crate::app_state::AppState;

pub const MIN_WIDTH_SLIDER: u8 = 10;
pub const MAX_WIDTH_SLIDER: u8 = 100;

/// Local state of the instruction widget. The published text lives in [`AppState`].
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionEditor {
    /// Text being typed.
    pub draft: String,
    width_slider: u8,
    buttons_visible: bool,
    slider_visible: bool,
}

impl Default for InstructionEditor {
    fn default() -> Self {
        Self {
            draft: String::new(),
            width_slider: 50,
            buttons_visible: true,
            slider_visible: false,
        }
    }
}

impl InstructionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the trimmed draft. Blank drafts are not published.
    pub fn submit(&mut self, state: &mut AppState) -> bool {
        let text = self.draft.trim();
        if text.is_empty() {
            return false;
        }
        state.set_instruction(text);
        self.draft.clear();
        true
    }

    /// Clear both the published instruction and the draft.
    pub fn reset(&mut self, state: &mut AppState) {
        state.reset_instruction();
        self.draft.clear();
    }

    pub fn width_slider(&self) -> u8 {
        self.width_slider
    }

    pub fn set_width_slider(&mut self, value: u8) {
        self.width_slider = value.clamp(MIN_WIDTH_SLIDER, MAX_WIDTH_SLIDER);
    }

    /// Display width in pixels, from 300 (slider 10) to 1200 (slider 100).
    pub fn display_width(&self) -> f64 {
        200.0 + f64::from(self.width_slider) / 100.0 * 1000.0
    }

    pub fn buttons_visible(&self) -> bool {
        self.buttons_visible
    }

    pub fn slider_visible(&self) -> bool {
        self.buttons_visible && self.slider_visible
    }

    pub fn toggle_slider(&mut self) {
        self.slider_visible = !self.slider_visible;
    }

    /// Show or hide the button row. Hiding it also closes the slider.
    pub fn toggle_buttons(&mut self) {
        self.buttons_visible = !self.buttons_visible;
        if !self.buttons_visible {
            self.slider_visible = false;
        }
    }

    /// Text to put on the clipboard, if there is any.
    pub fn clipboard_text(state: &AppState) -> Option<&str> {
        let text = state.instruction();
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_trims_and_clears() {
        let mut state = AppState::new();
        let mut editor = InstructionEditor::new();
        editor.draft = "  Ouvrez vos cahiers  ".to_string();
        assert!(editor.submit(&mut state));
        assert_eq!(state.instruction(), "Ouvrez vos cahiers");
        assert!(state.instruction_visible());
        assert!(editor.draft.is_empty());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut state = AppState::new();
        state.set_instruction("Avant");
        let mut editor = InstructionEditor::new();
        editor.draft = "   ".to_string();
        assert!(!editor.submit(&mut state));
        assert_eq!(state.instruction(), "Avant");
    }

    #[test]
    fn test_reset() {
        let mut state = AppState::new();
        let mut editor = InstructionEditor::new();
        state.set_instruction("Texte");
        editor.draft = "brouillon".to_string();
        editor.reset(&mut state);
        assert_eq!(state.instruction(), "");
        assert!(editor.draft.is_empty());
        assert!(InstructionEditor::clipboard_text(&state).is_none());
    }

    #[test]
    fn test_width_mapping() {
        let mut editor = InstructionEditor::new();
        assert_eq!(editor.display_width(), 700.0);
        editor.set_width_slider(0);
        assert_eq!(editor.width_slider(), 10);
        assert_eq!(editor.display_width(), 300.0);
        editor.set_width_slider(255);
        assert_eq!(editor.display_width(), 1200.0);
    }

    #[test]
    fn test_hiding_buttons_closes_slider() {
        let mut editor = InstructionEditor::new();
        editor.toggle_slider();
        assert!(editor.slider_visible());
        editor.toggle_buttons();
        assert!(!editor.slider_visible());
        editor.toggle_buttons();
        assert!(!editor.slider_visible());
    }
}
