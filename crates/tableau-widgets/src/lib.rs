//! Reusable egui components in the Tableau neobrutalist style.
//!
//! - **Buttons**: Icon buttons, push buttons
//! - **Card**: Bordered widget cards with a grip handle
//! - **Menu**: Sidebar items, separators, panel frames
//! - **Layout**: Section labels
//! - **Palette**: Light and dark colors

pub mod buttons;
pub mod card;
pub mod layout;
pub mod menu;
pub mod palette;

pub use buttons::{IconButton, TextButton};
pub use card::{Card, CardPart, CardResponse, CardWidth, card_frame, empty_slot};
pub use layout::section_label;
pub use menu::{menu_item, menu_separator, panel_frame, sidebar_frame};
pub use palette::{DARK, LIGHT, Palette};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Medium button size (toolbar buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel and card corner radius
    pub const PANEL_RADIUS: u8 = 8;
    /// Heavy neobrutalist border
    pub const BORDER_WIDTH: f32 = 2.0;
}
