//! Platform loaders for picture and video widgets.
//!
//! Native: file dialogs run on the UI thread (rfd), reads and decodes run on
//! a background thread and come back over a channel.
//! WASM: a hidden `<input type="file">` and `spawn_local` futures push into a
//! shared queue. Either way the app drains [`MediaLoader::poll_events`] once
//! per frame.

use std::path::PathBuf;

use tableau_core::widgets::{LoadTicket, MediaError, MediaKind, MediaResult, VideoSource};
use tableau_core::WidgetId;

/// Largest picture edge kept after decoding, in pixels.
const MAX_PICTURE_EDGE: u32 = 2560;

/// Decoded RGBA picture, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

/// Contents of a file the user picked.
#[derive(Debug, Clone, PartialEq)]
pub enum FileData {
    /// A file on disk (native).
    Path(PathBuf),
    /// File contents read by the browser.
    Bytes(Vec<u8>),
    /// Object URL of a browser file, for media that is streamed rather than read.
    ObjectUrl(String),
}

/// A file picked for a media widget, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub data: FileData,
}

/// Something the loader finished.
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// The user picked a file for `widget`.
    Picked {
        widget: WidgetId,
        kind: MediaKind,
        file: PickedFile,
    },
    /// A picture load finished.
    Decoded {
        widget: WidgetId,
        ticket: LoadTicket,
        result: MediaResult<DecodedImage>,
    },
}

/// Decode an encoded picture, shrinking oversized ones.
pub fn decode_picture(bytes: &[u8]) -> MediaResult<DecodedImage> {
    let image = image::load_from_memory(bytes).map_err(|e| MediaError::DecodeFailed(e.to_string()))?;
    let image = if image.width() > MAX_PICTURE_EDGE || image.height() > MAX_PICTURE_EDGE {
        image.thumbnail(MAX_PICTURE_EDGE, MAX_PICTURE_EDGE)
    } else {
        image
    };
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(DecodedImage {
        size,
        rgba: rgba.into_raw(),
    })
}

/// Video source for a picked video file.
pub fn video_from_file(data: &FileData) -> MediaResult<VideoSource> {
    match data {
        FileData::Path(path) => url::Url::from_file_path(path)
            .map(|url| VideoSource::Direct { url: url.to_string() })
            .map_err(|()| MediaError::InvalidUrl(path.display().to_string())),
        FileData::ObjectUrl(url) => Ok(VideoSource::Direct { url: url.clone() }),
        FileData::Bytes(_) => Err(MediaError::LoadFailed("video files are streamed, not read".into())),
    }
}

fn accepted_extensions(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Picture => &["png", "jpg", "jpeg", "webp"],
        MediaKind::Video => &["mp4", "webm", "ogg", "mov", "avi"],
    }
}

// ============================================================================
// Native loader
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native_loader {
    use super::*;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
    use std::thread;
    use std::time::Duration;
    use tableau_core::widgets::guess_mime;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Media loader for native platforms.
    pub struct NativeMediaLoader {
        event_tx: Sender<LoaderEvent>,
        event_rx: Receiver<LoaderEvent>,
    }

    impl Default for NativeMediaLoader {
        fn default() -> Self {
            Self::new()
        }
    }

    impl NativeMediaLoader {
        pub fn new() -> Self {
            let (event_tx, event_rx) = channel();
            Self { event_tx, event_rx }
        }

        /// Open a file dialog for `widget`. The choice arrives as [`LoaderEvent::Picked`].
        #[cfg(feature = "native")]
        pub fn pick_file(&self, widget: WidgetId, kind: MediaKind) {
            let (title, filter) = match kind {
                MediaKind::Picture => ("Choisir une image", "Images"),
                MediaKind::Video => ("Choisir une vidéo", "Vidéos"),
            };
            let Some(path) = rfd::FileDialog::new()
                .set_title(title)
                .add_filter(filter, accepted_extensions(kind))
                .pick_file()
            else {
                return;
            };

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let size = match std::fs::metadata(&path) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    log::error!("Failed to read {:?}: {}", path, e);
                    return;
                }
            };
            log::info!("Picked {:?} ({} bytes) for {}", path, size, widget);
            let file = PickedFile {
                mime: guess_mime(&name).to_string(),
                name,
                size,
                data: FileData::Path(path),
            };
            let _ = self.event_tx.send(LoaderEvent::Picked { widget, kind, file });
        }

        #[cfg(not(feature = "native"))]
        pub fn pick_file(&self, widget: WidgetId, _kind: MediaKind) {
            log::warn!("File dialogs need the native feature (widget {})", widget);
        }

        /// Read and decode a picked picture in the background.
        pub fn load_picture(&self, widget: WidgetId, ticket: LoadTicket, data: FileData) {
            let tx = self.event_tx.clone();
            thread::spawn(move || {
                let result = match data {
                    FileData::Path(path) => std::fs::read(&path)
                        .map_err(|e| MediaError::LoadFailed(e.to_string()))
                        .and_then(|bytes| decode_picture(&bytes)),
                    FileData::Bytes(bytes) => decode_picture(&bytes),
                    FileData::ObjectUrl(url) => Err(MediaError::LoadFailed(format!("cannot read {url}"))),
                };
                let _ = tx.send(LoaderEvent::Decoded { widget, ticket, result });
            });
        }

        /// Download and decode a picture in the background.
        pub fn fetch_picture(&self, widget: WidgetId, ticket: LoadTicket, url: String) {
            let tx = self.event_tx.clone();
            thread::spawn(move || {
                log::info!("Fetching picture {}", url);
                let result = fetch_bytes(&url).and_then(|bytes| decode_picture(&bytes));
                let _ = tx.send(LoaderEvent::Decoded { widget, ticket, result });
            });
        }

        /// Poll for finished work (non-blocking).
        pub fn poll_events(&mut self) -> Vec<LoaderEvent> {
            let mut events = Vec::new();
            loop {
                match self.event_rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
            events
        }
    }

    fn fetch_bytes(url: &str) -> MediaResult<Vec<u8>> {
        let load_failed = |e: reqwest::Error| MediaError::LoadFailed(e.to_string());
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(load_failed)?;
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(load_failed)?;
        let bytes = response.bytes().map_err(load_failed)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_loader::NativeMediaLoader;

// ============================================================================
// WASM loader
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod wasm_loader {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    type Queue = Rc<RefCell<Vec<LoaderEvent>>>;

    /// Media loader for the browser.
    #[derive(Default)]
    pub struct WasmMediaLoader {
        events: Queue,
    }

    impl WasmMediaLoader {
        pub fn new() -> Self {
            Self::default()
        }

        /// Open the browser file chooser for `widget`.
        pub fn pick_file(&self, widget: WidgetId, kind: MediaKind) {
            if let Err(e) = open_file_input(widget, kind, self.events.clone()) {
                log::error!("Failed to open file chooser: {:?}", e);
            }
        }

        /// Decode picked bytes. Runs inline: there is no thread to move it to.
        pub fn load_picture(&self, widget: WidgetId, ticket: LoadTicket, data: FileData) {
            let result = match data {
                FileData::Bytes(bytes) => decode_picture(&bytes),
                FileData::Path(path) => Err(MediaError::LoadFailed(format!("cannot read {}", path.display()))),
                FileData::ObjectUrl(url) => Err(MediaError::LoadFailed(format!("cannot read {url}"))),
            };
            self.events
                .borrow_mut()
                .push(LoaderEvent::Decoded { widget, ticket, result });
        }

        /// Download and decode a picture.
        pub fn fetch_picture(&self, widget: WidgetId, ticket: LoadTicket, url: String) {
            let events = self.events.clone();
            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Fetching picture {}", url);
                let result = fetch_bytes(&url).await.and_then(|bytes| decode_picture(&bytes));
                events
                    .borrow_mut()
                    .push(LoaderEvent::Decoded { widget, ticket, result });
            });
        }

        /// Take everything finished since the last call.
        pub fn poll_events(&mut self) -> Vec<LoaderEvent> {
            std::mem::take(&mut *self.events.borrow_mut())
        }
    }

    async fn fetch_bytes(url: &str) -> MediaResult<Vec<u8>> {
        let load_failed = |e: reqwest::Error| MediaError::LoadFailed(e.to_string());
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(load_failed)?;
        let bytes = response.bytes().await.map_err(load_failed)?;
        Ok(bytes.to_vec())
    }

    fn open_file_input(widget: WidgetId, kind: MediaKind, events: Queue) -> Result<(), wasm_bindgen::JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let body = document.body().ok_or("No body")?;

        let input = document
            .create_element("input")?
            .dyn_into::<web_sys::HtmlInputElement>()?;
        input.set_type("file");
        let accept: Vec<String> = accepted_extensions(kind).iter().map(|ext| format!(".{ext}")).collect();
        input.set_accept(&format!("{}*,{}", kind.mime_prefix(), accept.join(",")));
        input.style().set_property("display", "none")?;

        let input_clone = input.clone();
        let onchange = Closure::once(Box::new(move |_event: web_sys::Event| {
            if let Some(file) = input_clone.files().and_then(|files| files.get(0)) {
                read_picked_file(widget, kind, file, events);
            }
            input_clone.remove();
        }) as Box<dyn FnOnce(_)>);
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        body.append_child(&input)?;
        input.click();
        Ok(())
    }

    fn read_picked_file(widget: WidgetId, kind: MediaKind, file: web_sys::File, events: Queue) {
        let name = file.name();
        let mime = file.type_();
        let size = file.size() as u64;
        log::info!("Picked {} ({} bytes) for {}", name, size, widget);

        match kind {
            MediaKind::Video => {
                let data = match web_sys::Url::create_object_url_with_blob(&file) {
                    Ok(url) => FileData::ObjectUrl(url),
                    Err(e) => {
                        log::error!("Failed to create object URL: {:?}", e);
                        return;
                    }
                };
                let file = PickedFile { name, mime, size, data };
                events.borrow_mut().push(LoaderEvent::Picked { widget, kind, file });
            }
            MediaKind::Picture => {
                wasm_bindgen_futures::spawn_local(async move {
                    let buffer = match wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await {
                        Ok(buffer) => buffer,
                        Err(e) => {
                            log::error!("Failed to read {}: {:?}", name, e);
                            return;
                        }
                    };
                    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                    let file = PickedFile {
                        name,
                        mime,
                        size,
                        data: FileData::Bytes(bytes),
                    };
                    events.borrow_mut().push(LoaderEvent::Picked { widget, kind, file });
                });
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_loader::WasmMediaLoader;

/// Platform-specific loader type.
#[cfg(target_arch = "wasm32")]
pub type MediaLoader = WasmMediaLoader;

#[cfg(not(target_arch = "wasm32"))]
pub type MediaLoader = NativeMediaLoader;

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .expect("encode png");
        bytes.into_inner()
    }

    #[test]
    fn test_decode_picture() {
        let decoded = decode_picture(&png_bytes(4, 3)).unwrap();
        assert_eq!(decoded.size, [4, 3]);
        assert_eq!(decoded.rgba.len(), 4 * 3 * 4);
        assert_eq!(&decoded.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_picture(b"not an image").unwrap_err();
        assert!(matches!(err, MediaError::DecodeFailed(_)));
    }

    #[test]
    fn test_video_from_object_url() {
        let source = video_from_file(&FileData::ObjectUrl("blob:abc".into())).unwrap();
        assert_eq!(source, VideoSource::Direct { url: "blob:abc".into() });
        assert!(video_from_file(&FileData::Bytes(vec![1, 2, 3])).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_video_from_path() {
        let source = video_from_file(&FileData::Path(PathBuf::from("/tmp/cours.mp4"))).unwrap();
        assert_eq!(source, VideoSource::Direct { url: "file:///tmp/cours.mp4".into() });
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_load_picture_delivers_event() {
        use tableau_core::widgets::MediaState;

        let mut loader = MediaLoader::new();
        let mut state: MediaState<()> = MediaState::new(MediaKind::Picture);
        let ticket = state.begin_load("rouge.png");
        loader.load_picture(WidgetId::from("picture-0"), ticket, FileData::Bytes(png_bytes(2, 2)));

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(loader.poll_events());
            if !events.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        match events.as_slice() {
            [LoaderEvent::Decoded { widget, ticket: got, result: Ok(image) }] => {
                assert_eq!(widget.as_str(), "picture-0");
                assert_eq!(*got, ticket);
                assert_eq!(image.size, [2, 2]);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
