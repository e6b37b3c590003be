//! Application-wide state shared by the instruction widget and the shell.

use serde::{Deserialize, Serialize};

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Global state owned by the application root.
///
/// Fields are private; everything goes through the narrow mutators below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    instruction: String,
    instruction_visible: bool,
    theme: Theme,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published instruction text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn instruction_visible(&self) -> bool {
        self.instruction_visible
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Publish an instruction. It is visible exactly when it is non-empty.
    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.instruction = text.into();
        self.instruction_visible = !self.instruction.is_empty();
    }

    pub fn toggle_visible(&mut self) {
        self.instruction_visible = !self.instruction_visible;
    }

    /// Clear the instruction and hide it.
    pub fn reset_instruction(&mut self) {
        self.instruction.clear();
        self.instruction_visible = false;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            log::info!("Theme set to {:?}", theme);
        }
        self.theme = theme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_instruction_controls_visibility() {
        let mut state = AppState::new();
        state.set_instruction("Lisez la page 12");
        assert_eq!(state.instruction(), "Lisez la page 12");
        assert!(state.instruction_visible());

        state.set_instruction("");
        assert!(!state.instruction_visible());
    }

    #[test]
    fn test_toggle_and_reset() {
        let mut state = AppState::new();
        state.set_instruction("Silence");
        state.toggle_visible();
        assert!(!state.instruction_visible());
        state.toggle_visible();
        assert!(state.instruction_visible());

        state.reset_instruction();
        assert_eq!(state.instruction(), "");
        assert!(!state.instruction_visible());
    }

    #[test]
    fn test_theme() {
        let mut state = AppState::new();
        assert_eq!(state.theme(), Theme::Light);
        state.set_theme(Theme::Dark);
        assert!(state.theme().is_dark());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
