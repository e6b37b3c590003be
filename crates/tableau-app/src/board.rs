//! Everything on the board: the canvas controller, per-widget state, the
//! shared app state and the roster query.

use std::collections::HashMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tableau_core::widgets::{
    GroupMaker, InstructionEditor, MediaKind, MediaResult, MediaState, Playback, Student, Timer,
    VideoSource,
};
use tableau_core::{
    AppState, CanvasConfig, CanvasController, DragEvent, DragOutcome, SensorConfig,
    UserDirectory, WidgetId, WidgetKind,
};

use crate::drag_bridge::DragBridge;
use crate::loader::{DecodedImage, LoaderEvent, MediaLoader, video_from_file};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// How often to look for finished background work.
const LOADER_POLL: Duration = Duration::from_millis(100);

/// A picture uploaded to the GPU.
#[derive(Clone)]
pub struct Picture {
    pub texture: egui::TextureHandle,
    pub pixels: [usize; 2],
}

/// Timer plus the text of its minutes field.
#[derive(Debug, Clone, Default)]
pub struct TimerWidget {
    pub timer: Timer,
    pub minutes_input: String,
    pub editing: bool,
}

#[derive(Clone)]
pub struct PictureWidget {
    pub media: MediaState<Picture>,
    pub caption_input: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VideoWidget {
    pub media: MediaState<VideoSource>,
    pub playback: Playback,
    pub caption_input: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupsWidget {
    pub maker: GroupMaker,
    pub size_input: String,
}

/// State of one mounted widget.
#[derive(Clone)]
pub enum WidgetState {
    Instruction(InstructionEditor),
    Timer(TimerWidget),
    Picture(PictureWidget),
    Video(VideoWidget),
    Groups(GroupsWidget),
}

impl WidgetState {
    /// Fresh state for a widget of `kind`.
    pub fn new(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Instruction => WidgetState::Instruction(InstructionEditor::new()),
            WidgetKind::Timer => WidgetState::Timer(TimerWidget::default()),
            WidgetKind::Picture => WidgetState::Picture(PictureWidget {
                media: MediaState::new(MediaKind::Picture),
                caption_input: None,
            }),
            WidgetKind::Video => WidgetState::Video(VideoWidget {
                media: MediaState::new(MediaKind::Video),
                playback: Playback::default(),
                caption_input: None,
            }),
            WidgetKind::Groups => WidgetState::Groups(GroupsWidget::default()),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetState::Instruction(_) => WidgetKind::Instruction,
            WidgetState::Timer(_) => WidgetKind::Timer,
            WidgetState::Picture(_) => WidgetKind::Picture,
            WidgetState::Video(_) => WidgetKind::Video,
            WidgetState::Groups(_) => WidgetKind::Groups,
        }
    }
}

/// The whole board.
pub struct Board {
    pub canvas: CanvasController,
    pub app_state: AppState,
    pub bridge: DragBridge,
    pub directory: UserDirectory,
    pub rng: StdRng,
    widgets: HashMap<WidgetId, WidgetState>,
}

impl Board {
    pub fn new(canvas: CanvasConfig, sensor: SensorConfig, directory: UserDirectory) -> Self {
        Self {
            canvas: CanvasController::new(canvas),
            app_state: AppState::new(),
            bridge: DragBridge::new(sensor),
            directory,
            rng: StdRng::from_rng(&mut rand::rng()),
            widgets: HashMap::new(),
        }
    }

    /// Mount a widget of `kind`.
    pub fn add_tool(&mut self, kind: WidgetKind, now: Instant) -> WidgetId {
        let id = self.canvas.add_tool(kind);
        let mut state = WidgetState::new(kind);
        if let WidgetState::Groups(widget) = &mut state {
            widget.maker.set_students(self.roster());
            self.directory.cache_mut().subscribe(now);
        }
        self.widgets.insert(id.clone(), state);
        id
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&WidgetState> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: &WidgetId) -> Option<&mut WidgetState> {
        self.widgets.get_mut(id)
    }

    /// A widget's state together with what its view may also mutate.
    pub fn view_parts(&mut self, id: &WidgetId) -> Option<(&mut WidgetState, &mut AppState, &mut StdRng)> {
        let state = self.widgets.get_mut(id)?;
        Some((state, &mut self.app_state, &mut self.rng))
    }

    /// Apply drag events to the canvas, in order.
    pub fn apply_drag_events(&mut self, events: Vec<DragEvent>) -> Vec<DragOutcome> {
        events.into_iter().map(|event| self.canvas.handle(event)).collect()
    }

    /// Advance clocks and queries. Returns how soon something needs another frame.
    pub fn update(&mut self, now: Instant) -> Option<Duration> {
        let mut wake: Option<Duration> = None;
        let mut wake_in = |d: Duration| wake = Some(wake.map_or(d, |w| w.min(d)));

        for state in self.widgets.values_mut() {
            match state {
                WidgetState::Timer(widget) => {
                    widget.timer.advance(now);
                    if let Some(next) = widget.timer.next_tick_in(now) {
                        wake_in(next);
                    }
                }
                // Poll the loader until the picture lands.
                WidgetState::Picture(widget) if widget.media.load().is_loading() => {
                    wake_in(LOADER_POLL);
                }
                _ => {}
            }
        }

        if self.directory.cache().observers() > 0 || self.directory.cache().is_fetching() {
            if self.directory.update(now) {
                self.sync_rosters();
            }
            if let Some(retry) = self.directory.next_retry_in(now) {
                wake_in(retry);
            }
            if self.directory.cache().is_fetching() {
                wake_in(LOADER_POLL);
            }
        }

        wake
    }

    /// Hand the loaded user list to every group widget.
    fn sync_rosters(&mut self) {
        let Some(users) = self.directory.cache().state().data else {
            return;
        };
        let students: Vec<Student> = users.iter().map(Student::from).collect();
        for state in self.widgets.values_mut() {
            if let WidgetState::Groups(widget) = state {
                if widget.maker.students() != students.as_slice() {
                    widget.maker.set_students(students.clone());
                }
            }
        }
    }

    /// Roster for a group widget mounted after the directory loaded.
    pub fn roster(&self) -> Vec<Student> {
        self.directory
            .cache()
            .state()
            .data
            .map(|users| users.iter().map(Student::from).collect())
            .unwrap_or_default()
    }

    /// Apply finished loader work.
    pub fn apply_loader_event(&mut self, event: LoaderEvent, loader: &MediaLoader, ctx: &egui::Context) {
        match event {
            LoaderEvent::Picked { widget, kind, file } => {
                let Some(state) = self.widgets.get_mut(&widget) else {
                    log::warn!("Picked file for unknown widget {}", widget);
                    return;
                };
                match (state, kind) {
                    (WidgetState::Picture(picture), MediaKind::Picture) => {
                        if let Err(e) = kind.validate_file(&file.mime, file.size) {
                            picture.media.fail(e);
                            return;
                        }
                        let ticket = picture.media.begin_load(file.name);
                        loader.load_picture(widget, ticket, file.data);
                    }
                    (WidgetState::Video(video), MediaKind::Video) => {
                        if let Err(e) = kind.validate_file(&file.mime, file.size) {
                            video.media.fail(e);
                            return;
                        }
                        let ticket = video.media.begin_load(file.name);
                        video.playback = Playback::default();
                        video.media.finish_load(ticket, video_from_file(&file.data));
                    }
                    _ => log::warn!("Picked {:?} file for {}, which shows other media", kind, widget),
                }
            }
            LoaderEvent::Decoded { widget, ticket, result } => {
                let Some(WidgetState::Picture(picture)) = self.widgets.get_mut(&widget) else {
                    return;
                };
                let result = result.map(|image| upload_picture(ctx, &widget, image));
                if !picture.media.finish_load(ticket, result) {
                    log::debug!("Dropped stale picture load for {}", widget);
                }
            }
        }
    }
}

fn upload_picture(ctx: &egui::Context, id: &WidgetId, image: DecodedImage) -> Picture {
    let color = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.rgba);
    let texture = ctx.load_texture(format!("picture-{id}"), color, egui::TextureOptions::LINEAR);
    Picture {
        texture,
        pixels: image.size,
    }
}

/// Start loading a URL typed into a picture widget.
pub fn submit_picture_url(picture: &mut PictureWidget, id: &WidgetId, loader: &MediaLoader) {
    if let Some((ticket, url)) = picture.media.submit_url() {
        loader.fetch_picture(id.clone(), ticket, url);
    }
}

/// Classify a URL typed into a video widget. Nothing to download.
pub fn submit_video_url(video: &mut VideoWidget) -> bool {
    let Some((ticket, url)) = video.media.submit_url() else {
        return false;
    };
    video.playback = Playback::default();
    let source: MediaResult<VideoSource> = Ok(VideoSource::classify(&url));
    video.media.finish_load(ticket, source)
}

impl Default for Board {
    fn default() -> Self {
        Self::new(
            CanvasConfig::default(),
            SensorConfig::default(),
            UserDirectory::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag_bridge::PointerFrame;
    use crate::loader::{FileData, PickedFile};
    use kurbo::{Point, Rect, Size};
    use tableau_core::PointerTarget;
    use tableau_core::widgets::{Loadable, MediaError};

    fn board() -> Board {
        let config = CanvasConfig::default().with_viewport(Size::new(1920.0, 1080.0));
        Board::new(config, SensorConfig::default(), UserDirectory::default())
    }

    #[test]
    fn test_add_tool_creates_matching_state() {
        let mut board = board();
        let now = Instant::now();
        for kind in WidgetKind::ALL {
            let id = board.add_tool(kind, now);
            assert_eq!(board.widget(&id).map(WidgetState::kind), Some(kind));
        }
        assert_eq!(board.canvas.widgets().len(), WidgetKind::ALL.len());
    }

    #[test]
    fn test_adding_groups_subscribes_directory() {
        let mut board = board();
        let now = Instant::now();
        board.add_tool(WidgetKind::Timer, now);
        assert_eq!(board.directory.cache().observers(), 0);
        board.add_tool(WidgetKind::Groups, now);
        assert_eq!(board.directory.cache().observers(), 1);
    }

    #[test]
    fn test_pointer_drag_moves_widget() {
        let mut board = board();
        let now = Instant::now();
        let id = board.add_tool(WidgetKind::Timer, now);
        board.canvas.record_layout(&id, Rect::new(800.0, 400.0, 1000.0, 550.0));

        let press = PointerFrame {
            pressed: Some((PointerTarget::Handle(id.clone()), Point::new(810.0, 410.0))),
            pos: Some(Point::new(810.0, 410.0)),
            ..Default::default()
        };
        let events = board.bridge.step(press, now);
        board.apply_drag_events(events);

        let moved = PointerFrame {
            pos: Some(Point::new(760.0, 440.0)),
            ..Default::default()
        };
        let events = board.bridge.step(moved, now);
        board.apply_drag_events(events);
        assert!(board.canvas.is_dragging(&id));
        assert_eq!(board.canvas.visual_position(&id), Point::new(750.0, 430.0));

        let release = PointerFrame {
            pos: Some(Point::new(760.0, 440.0)),
            released: true,
            ..Default::default()
        };
        let events = board.bridge.step(release, now);
        let outcomes = board.apply_drag_events(events);
        assert_eq!(
            outcomes,
            vec![DragOutcome::Committed {
                id: id.clone(),
                position: Point::new(750.0, 430.0),
            }]
        );
        assert_eq!(board.canvas.position(&id), Point::new(750.0, 430.0));
    }

    #[test]
    fn test_update_advances_running_timers() {
        let mut board = board();
        let start = Instant::now();
        let id = board.add_tool(WidgetKind::Timer, start);
        if let Some(WidgetState::Timer(widget)) = board.widget_mut(&id) {
            widget.timer.toggle(start);
        }

        let wake = board.update(start + Duration::from_millis(2500));
        let Some(WidgetState::Timer(widget)) = board.widget(&id) else {
            panic!("timer state missing");
        };
        assert_eq!(widget.timer.remaining(), 298);
        assert_eq!(wake, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_video_url_is_classified() {
        let mut video = match WidgetState::new(WidgetKind::Video) {
            WidgetState::Video(video) => video,
            _ => unreachable!(),
        };
        video.media.url_input = "https://youtu.be/dQw4w9WgXcQ".into();
        assert!(submit_video_url(&mut video));
        assert_eq!(
            video.media.load(),
            &Loadable::Ready(VideoSource::YouTube { id: "dQw4w9WgXcQ".into() })
        );
    }

    #[test]
    fn test_picked_video_is_validated() {
        let mut board = board();
        let ctx = egui::Context::default();
        let loader = MediaLoader::new();
        let id = board.add_tool(WidgetKind::Video, Instant::now());

        let too_big = PickedFile {
            name: "cours.mp4".into(),
            mime: "video/mp4".into(),
            size: 200 * 1024 * 1024,
            data: FileData::ObjectUrl("blob:1".into()),
        };
        board.apply_loader_event(
            LoaderEvent::Picked {
                widget: id.clone(),
                kind: MediaKind::Video,
                file: too_big,
            },
            &loader,
            &ctx,
        );
        let Some(WidgetState::Video(video)) = board.widget(&id) else {
            panic!("video state missing");
        };
        assert!(matches!(video.media.load(), Loadable::Failed(MediaError::TooLarge { .. })));

        let ok = PickedFile {
            name: "cours.mp4".into(),
            mime: "video/mp4".into(),
            size: 1024,
            data: FileData::ObjectUrl("blob:2".into()),
        };
        board.apply_loader_event(
            LoaderEvent::Picked {
                widget: id.clone(),
                kind: MediaKind::Video,
                file: ok,
            },
            &loader,
            &ctx,
        );
        let Some(WidgetState::Video(video)) = board.widget(&id) else {
            panic!("video state missing");
        };
        assert_eq!(
            video.media.load(),
            &Loadable::Ready(VideoSource::Direct { url: "blob:2".into() })
        );
    }

    #[test]
    fn test_picture_rejects_wrong_type() {
        let mut board = board();
        let ctx = egui::Context::default();
        let loader = MediaLoader::new();
        let id = board.add_tool(WidgetKind::Picture, Instant::now());
        let file = PickedFile {
            name: "notes.txt".into(),
            mime: "text/plain".into(),
            size: 10,
            data: FileData::Bytes(b"hello".to_vec()),
        };
        board.apply_loader_event(
            LoaderEvent::Picked {
                widget: id.clone(),
                kind: MediaKind::Picture,
                file,
            },
            &loader,
            &ctx,
        );
        let Some(WidgetState::Picture(picture)) = board.widget(&id) else {
            panic!("picture state missing");
        };
        assert!(matches!(picture.media.load(), Loadable::Failed(MediaError::InvalidType { .. })));
    }
}
