//! Video URL classification and playback flags.

use url::Url;

/// Where a video comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String },
    Vimeo { id: String },
    Dailymotion { id: String },
    Twitch { id: String },
    /// A URL pointing straight at a video file.
    Direct { url: String },
    /// A local file or any URL we do not recognise.
    Other { url: String },
}

const DIRECT_EXTENSIONS: [&str; 5] = ["mp4", "webm", "ogg", "mov", "avi"];

impl VideoSource {
    /// Classify a URL typed by the user.
    pub fn classify(input: &str) -> Self {
        let input = input.trim();
        let parsed = Url::parse(input).or_else(|_| Url::parse(&format!("https://{input}")));
        let Ok(url) = parsed else {
            return VideoSource::Other { url: input.to_string() };
        };
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host
            .strip_prefix("www.")
            .or_else(|| host.strip_prefix("m."))
            .unwrap_or(&host);
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let found = match host {
            "youtube.com" => youtube_id(&url, &segments).map(|id| VideoSource::YouTube { id }),
            "youtu.be" => segments.first().map(|id| VideoSource::YouTube { id: id.to_string() }),
            "vimeo.com" | "player.vimeo.com" => segments
                .iter()
                .find(|s| s.chars().all(|c| c.is_ascii_digit()))
                .map(|id| VideoSource::Vimeo { id: id.to_string() }),
            "dailymotion.com" => match segments.as_slice() {
                ["video", id, ..] => id
                    .split('_')
                    .next()
                    .filter(|id| !id.is_empty())
                    .map(|id| VideoSource::Dailymotion { id: id.to_string() }),
                _ => None,
            },
            "twitch.tv" => match segments.as_slice() {
                ["videos", id, ..] if id.chars().all(|c| c.is_ascii_digit()) => {
                    Some(VideoSource::Twitch { id: id.to_string() })
                }
                _ => None,
            },
            _ => None,
        };
        if let Some(source) = found {
            return source;
        }

        let is_direct = segments
            .last()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| DIRECT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_direct {
            VideoSource::Direct { url: input.to_string() }
        } else {
            VideoSource::Other { url: input.to_string() }
        }
    }

    /// Player URL for embeddable hosts. `host` is the page's own host name (Twitch needs it).
    pub fn embed_url(&self, host: &str) -> Option<String> {
        match self {
            VideoSource::YouTube { id } => {
                Some(format!("https://www.youtube.com/embed/{id}?enablejsapi=1&rel=0"))
            }
            VideoSource::Vimeo { id } => Some(format!(
                "https://player.vimeo.com/video/{id}?title=0&byline=0&portrait=0"
            )),
            VideoSource::Dailymotion { id } => {
                Some(format!("https://www.dailymotion.com/embed/video/{id}"))
            }
            VideoSource::Twitch { id } => Some(format!(
                "https://player.twitch.tv/?video={id}&parent={host}&autoplay=false"
            )),
            VideoSource::Direct { .. } | VideoSource::Other { .. } => None,
        }
    }

    /// URL to hand to a player or browser.
    pub fn open_url(&self, host: &str) -> String {
        match self {
            VideoSource::Direct { url } | VideoSource::Other { url } => url.clone(),
            embeddable => embeddable.embed_url(host).unwrap_or_default(),
        }
    }

    /// Whether playback is controlled by us rather than an embedded player.
    pub fn is_direct(&self) -> bool {
        matches!(self, VideoSource::Direct { .. } | VideoSource::Other { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoSource::YouTube { .. } => "YouTube",
            VideoSource::Vimeo { .. } => "Vimeo",
            VideoSource::Dailymotion { .. } => "Dailymotion",
            VideoSource::Twitch { .. } => "Twitch",
            VideoSource::Direct { .. } => "Vidéo",
            VideoSource::Other { .. } => "Fichier",
        }
    }
}

fn youtube_id(url: &Url, segments: &[&str]) -> Option<String> {
    match segments {
        ["watch"] => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty()),
        ["embed", id, ..] | ["shorts", id, ..] => Some(id.to_string()),
        _ => None,
    }
}

/// Playback flags of a directly played video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    pub playing: bool,
    pub muted: bool,
}

impl Playback {
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yt(id: &str) -> VideoSource {
        VideoSource::YouTube { id: id.to_string() }
    }

    #[test]
    fn test_youtube_forms() {
        assert_eq!(VideoSource::classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), yt("dQw4w9WgXcQ"));
        assert_eq!(VideoSource::classify("https://youtube.com/watch?feature=x&v=abc123"), yt("abc123"));
        assert_eq!(VideoSource::classify("https://youtu.be/abc123?t=5"), yt("abc123"));
        assert_eq!(VideoSource::classify("youtube.com/embed/abc123"), yt("abc123"));
    }

    #[test]
    fn test_other_hosts() {
        assert_eq!(
            VideoSource::classify("https://vimeo.com/76979871"),
            VideoSource::Vimeo { id: "76979871".into() }
        );
        assert_eq!(
            VideoSource::classify("https://www.dailymotion.com/video/x7tgad0_some-title"),
            VideoSource::Dailymotion { id: "x7tgad0".into() }
        );
        assert_eq!(
            VideoSource::classify("https://www.twitch.tv/videos/123456"),
            VideoSource::Twitch { id: "123456".into() }
        );
    }

    #[test]
    fn test_direct_and_other() {
        assert!(matches!(
            VideoSource::classify("https://cdn.example.org/cours/intro.MP4?token=1"),
            VideoSource::Direct { .. }
        ));
        assert!(matches!(
            VideoSource::classify("https://example.org/page"),
            VideoSource::Other { .. }
        ));
        assert!(matches!(VideoSource::classify("not a url at all"), VideoSource::Other { .. }));
    }

    #[test]
    fn test_embed_urls() {
        assert_eq!(
            yt("abc").embed_url("localhost").as_deref(),
            Some("https://www.youtube.com/embed/abc?enablejsapi=1&rel=0")
        );
        assert_eq!(
            VideoSource::Twitch { id: "9".into() }.embed_url("tableau.local").as_deref(),
            Some("https://player.twitch.tv/?video=9&parent=tableau.local&autoplay=false")
        );
        assert!(VideoSource::Direct { url: "a.mp4".into() }.embed_url("h").is_none());
    }

    #[test]
    fn test_playback_flags() {
        let mut playback = Playback::default();
        playback.toggle_play();
        playback.toggle_mute();
        assert!(playback.playing && playback.muted);
    }
}
