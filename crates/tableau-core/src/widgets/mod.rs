//! State machines behind the board widgets.
//!
//! Each widget owns its state; nothing here touches positions or other
//! widgets. The app shell keeps one state value per [`WidgetId`](crate::WidgetId).

pub mod groups;
pub mod instruction;
pub mod media;
pub mod timer;
pub mod video;

pub use groups::{GroupMaker, Student, make_groups};
pub use instruction::{InstructionEditor, MAX_WIDTH_SLIDER, MIN_WIDTH_SLIDER};
pub use media::{
    LoadTicket, Loadable, MAX_CAPTION_CHARS, MAX_VIDEO_BYTES, MediaError, MediaKind, MediaResult, MediaState,
    SizeConstraints, guess_mime,
};
pub use timer::{DEFAULT_SECONDS, QUICK_ADJUSTMENTS, Timer, Urgency};
pub use video::{Playback, VideoSource};
