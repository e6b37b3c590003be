//! Embedded SVG icons. Strokes are white so egui tints them.

use egui::{ImageSource, include_image};
use tableau_core::WidgetKind;

/// Sidebar icon of a tool.
pub fn tool(kind: WidgetKind) -> ImageSource<'static> {
    match kind.icon() {
        "image" => include_image!("../assets/image.svg"),
        "video" => include_image!("../assets/video.svg"),
        "text" => include_image!("../assets/text.svg"),
        "timer" => include_image!("../assets/timer.svg"),
        _ => include_image!("../assets/users.svg"),
    }
}

pub fn grip() -> ImageSource<'static> {
    include_image!("../assets/grip.svg")
}

pub fn sun() -> ImageSource<'static> {
    include_image!("../assets/sun.svg")
}

pub fn moon() -> ImageSource<'static> {
    include_image!("../assets/moon.svg")
}

pub fn play() -> ImageSource<'static> {
    include_image!("../assets/play.svg")
}

pub fn pause() -> ImageSource<'static> {
    include_image!("../assets/pause.svg")
}

pub fn eye() -> ImageSource<'static> {
    include_image!("../assets/eye.svg")
}

pub fn eye_off() -> ImageSource<'static> {
    include_image!("../assets/eye-off.svg")
}

pub fn copy() -> ImageSource<'static> {
    include_image!("../assets/copy.svg")
}

pub fn trash() -> ImageSource<'static> {
    include_image!("../assets/trash.svg")
}

pub fn link() -> ImageSource<'static> {
    include_image!("../assets/link.svg")
}

pub fn upload() -> ImageSource<'static> {
    include_image!("../assets/upload.svg")
}

pub fn sliders() -> ImageSource<'static> {
    include_image!("../assets/sliders.svg")
}

pub fn grid() -> ImageSource<'static> {
    include_image!("../assets/grid.svg")
}

pub fn lock() -> ImageSource<'static> {
    include_image!("../assets/lock.svg")
}

pub fn unlock() -> ImageSource<'static> {
    include_image!("../assets/unlock.svg")
}

pub fn menu() -> ImageSource<'static> {
    include_image!("../assets/menu.svg")
}

pub fn volume() -> ImageSource<'static> {
    include_image!("../assets/volume.svg")
}

pub fn volume_off() -> ImageSource<'static> {
    include_image!("../assets/volume-x.svg")
}

pub fn external_link() -> ImageSource<'static> {
    include_image!("../assets/external-link.svg")
}

pub fn shuffle() -> ImageSource<'static> {
    include_image!("../assets/shuffle.svg")
}

pub fn close() -> ImageSource<'static> {
    include_image!("../assets/x.svg")
}

pub fn pencil() -> ImageSource<'static> {
    include_image!("../assets/pencil.svg")
}
