use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Bare video ID, anchored on both ends
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("valid video id pattern"));

/// URL patterns, tried in order; the first capture wins
static URL_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)([a-zA-Z0-9_-]{11})",
        )
        .expect("valid primary url pattern"),
        Regex::new(r"youtube\.com/watch\?.*v=([a-zA-Z0-9_-]{11})")
            .expect("valid fallback url pattern"),
    ]
});

/// Input shapes accepted by [`extract_video_id`], for user-facing guidance
pub const SUPPORTED_FORMATS: &[&str] = &[
    "https://www.youtube.com/watch?v=VIDEO_ID",
    "https://m.youtube.com/watch?v=VIDEO_ID",
    "https://youtu.be/VIDEO_ID",
    "https://www.youtube.com/embed/VIDEO_ID",
    "https://www.youtube.com/v/VIDEO_ID",
    "VIDEO_ID (direct ID)",
];

/// An 11-character YouTube video identifier.
///
/// Can only be built from a string that passes the identifier check, so every
/// value is exactly 11 characters of `[a-zA-Z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Validate a bare identifier
    pub fn new(id: &str) -> Option<Self> {
        BARE_ID.is_match(id).then(|| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract a video ID from a YouTube URL, or accept a bare ID as-is.
///
/// Returns `None` when nothing matches; that is an ordinary outcome for the
/// caller to report, not an error.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    if let Some(id) = VideoId::new(input) {
        return Some(id);
    }

    URL_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| VideoId(m.as_str().to_string()))
    })
}
