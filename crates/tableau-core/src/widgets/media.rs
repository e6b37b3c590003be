//! Loadable media shared by the picture and video widgets.

use kurbo::Size;
use thiserror::Error;

/// Maximum caption length in characters.
pub const MAX_CAPTION_CHARS: usize = 50;

/// Largest video file accepted (100 MiB).
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

/// Errors that can occur while loading media.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MediaError {
    #[error("expected a {expected} file, got {found}")]
    InvalidType { expected: &'static str, found: String },
    #[error("file is too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to load media: {0}")]
    LoadFailed(String),
    #[error("failed to decode media: {0}")]
    DecodeFailed(String),
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Which media a widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Picture,
    Video,
}

/// Resize limits of a media box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeConstraints {
    pub min: Size,
    pub max: Size,
    pub default: Size,
}

impl SizeConstraints {
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.min.width).min(self.max.width),
            size.height.max(self.min.height).min(self.max.height),
        )
    }
}

impl MediaKind {
    pub fn default_caption(self) -> &'static str {
        match self {
            MediaKind::Picture => "Image",
            MediaKind::Video => "Vidéo",
        }
    }

    pub fn constraints(self) -> SizeConstraints {
        match self {
            MediaKind::Picture => SizeConstraints {
                min: Size::new(300.0, 250.0),
                max: Size::new(2560.0, 1440.0),
                default: Size::new(300.0, 250.0),
            },
            MediaKind::Video => SizeConstraints {
                min: Size::new(300.0, 300.0),
                max: Size::new(1920.0, 1080.0),
                default: Size::new(400.0, 350.0),
            },
        }
    }

    /// MIME type family accepted from files.
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Picture => "image/",
            MediaKind::Video => "video/",
        }
    }

    pub fn max_file_size(self) -> Option<u64> {
        match self {
            MediaKind::Picture => None,
            MediaKind::Video => Some(MAX_VIDEO_BYTES),
        }
    }

    /// Check a picked file before reading it.
    pub fn validate_file(self, mime: &str, size: u64) -> MediaResult<()> {
        if !mime.starts_with(self.mime_prefix()) {
            return Err(MediaError::InvalidType {
                expected: self.mime_prefix().trim_end_matches('/'),
                found: mime.to_string(),
            });
        }
        if let Some(max) = self.max_file_size() {
            if size > max {
                return Err(MediaError::TooLarge { size, max });
            }
        }
        Ok(())
    }
}

/// Best-effort MIME type from a file name, for platforms that only give us a path.
pub fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Load progress of a media payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Idle,
    Loading { source: String },
    Ready(T),
    Failed(MediaError),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading { .. })
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Identifies one load request so stale results can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// State of a picture or video widget.
#[derive(Debug, Clone)]
pub struct MediaState<T> {
    kind: MediaKind,
    load: Loadable<T>,
    caption: String,
    size: Size,
    /// Contents of the URL field.
    pub url_input: String,
    url_panel_open: bool,
    generation: u64,
}

impl<T> MediaState<T> {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            load: Loadable::Idle,
            caption: kind.default_caption().to_string(),
            size: kind.constraints().default,
            url_input: String::new(),
            url_panel_open: false,
            generation: 0,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn load(&self) -> &Loadable<T> {
        &self.load
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Start a load. Any load still in flight becomes stale.
    pub fn begin_load(&mut self, source: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        self.load = Loadable::Loading { source: source.into() };
        LoadTicket(self.generation)
    }

    /// Start loading the URL typed in the panel. Blank input does nothing.
    pub fn submit_url(&mut self) -> Option<(LoadTicket, String)> {
        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            return None;
        }
        self.url_panel_open = false;
        self.url_input.clear();
        Some((self.begin_load(url.clone()), url))
    }

    /// Deliver the result of a load. Returns false for stale tickets.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: MediaResult<T>) -> bool {
        if ticket.0 != self.generation || !self.load.is_loading() {
            return false;
        }
        self.load = match result {
            Ok(value) => Loadable::Ready(value),
            Err(err) => {
                log::warn!("{:?} load failed: {}", self.kind, err);
                Loadable::Failed(err)
            }
        };
        true
    }

    /// Record a failure detected before any load started (e.g. a rejected file).
    pub fn fail(&mut self, err: MediaError) {
        log::warn!("{:?} rejected: {}", self.kind, err);
        self.generation += 1;
        self.load = Loadable::Failed(err);
    }

    /// Drop the media and go back to the empty state.
    pub fn remove(&mut self) {
        self.generation += 1;
        self.load = Loadable::Idle;
    }

    /// Replace the caption. Blank edits keep the previous caption.
    pub fn set_caption(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.caption = text.chars().take(MAX_CAPTION_CHARS).collect();
        true
    }

    pub fn resize(&mut self, size: Size) {
        self.size = self.kind.constraints().clamp(size);
    }

    pub fn url_panel_open(&self) -> bool {
        self.url_panel_open
    }

    pub fn toggle_url_panel(&mut self) {
        self.url_panel_open = !self.url_panel_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let picture: MediaState<()> = MediaState::new(MediaKind::Picture);
        assert_eq!(picture.caption(), "Image");
        assert_eq!(picture.size(), Size::new(300.0, 250.0));
        let video: MediaState<()> = MediaState::new(MediaKind::Video);
        assert_eq!(video.caption(), "Vidéo");
        assert_eq!(video.size(), Size::new(400.0, 350.0));
    }

    #[test]
    fn test_load_lifecycle() {
        let mut state = MediaState::new(MediaKind::Picture);
        let ticket = state.begin_load("photo.png");
        assert!(state.load().is_loading());
        assert!(state.finish_load(ticket, Ok(7u32)));
        assert_eq!(state.load().ready(), Some(&7));
        state.remove();
        assert_eq!(state.load(), &Loadable::Idle);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut state = MediaState::new(MediaKind::Picture);
        let old = state.begin_load("a.png");
        let new = state.begin_load("b.png");
        assert!(!state.finish_load(old, Ok(1u32)));
        assert!(state.load().is_loading());
        assert!(state.finish_load(new, Err(MediaError::DecodeFailed("bad".into()))));
        assert!(matches!(state.load(), Loadable::Failed(MediaError::DecodeFailed(_))));
    }

    #[test]
    fn test_submit_url() {
        let mut state: MediaState<()> = MediaState::new(MediaKind::Video);
        state.toggle_url_panel();
        state.url_input = "   ".into();
        assert!(state.submit_url().is_none());
        state.url_input = " https://vimeo.com/1 ".into();
        let (_, url) = state.submit_url().unwrap();
        assert_eq!(url, "https://vimeo.com/1");
        assert!(!state.url_panel_open());
    }

    #[test]
    fn test_caption_edits() {
        let mut state: MediaState<()> = MediaState::new(MediaKind::Picture);
        assert!(!state.set_caption("   "));
        assert_eq!(state.caption(), "Image");
        assert!(state.set_caption("  Carte de France "));
        assert_eq!(state.caption(), "Carte de France");
        state.set_caption(&"é".repeat(80));
        assert_eq!(state.caption().chars().count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn test_resize_is_clamped() {
        let mut state: MediaState<()> = MediaState::new(MediaKind::Video);
        state.resize(Size::new(100.0, 5000.0));
        assert_eq!(state.size(), Size::new(300.0, 1080.0));
    }

    #[test]
    fn test_validate_file() {
        assert!(MediaKind::Picture.validate_file("image/png", 10).is_ok());
        assert!(matches!(
            MediaKind::Picture.validate_file("video/mp4", 10),
            Err(MediaError::InvalidType { .. })
        ));
        assert!(matches!(
            MediaKind::Video.validate_file("video/mp4", MAX_VIDEO_BYTES + 1),
            Err(MediaError::TooLarge { .. })
        ));
        assert!(MediaKind::Video.validate_file("video/webm", MAX_VIDEO_BYTES).is_ok());
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("Photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime("clip.mov"), "video/quicktime");
        assert_eq!(guess_mime("notes"), "application/octet-stream");
    }
}
