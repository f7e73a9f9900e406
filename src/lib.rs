//! yt-captions - A Rust CLI tool for pulling captions out of YouTube videos
//!
//! This library extracts a video ID from the usual YouTube URL shapes (or a bare ID),
//! retrieves the caption track text for that video and renders it for the console
//! or a plain-text file.

pub mod cli;
pub mod config;
pub mod extractor;
pub mod output;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::{Config, FALLBACK_LANGUAGES};
pub use extractor::{extract_video_id, VideoId};
pub use transcript::{TranscriptRetriever, TranscriptService};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Classified failures surfaced to the user
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    #[error("Could not extract video ID from: {0}")]
    InvalidInput(String),

    #[error("Transcripts are disabled for video ID: {0}")]
    TranscriptsDisabled(VideoId),

    #[error("No transcript found for video ID: {0}")]
    NoTranscriptFound(VideoId),

    #[error("Video is unavailable or doesn't exist: {0}")]
    VideoUnavailable(VideoId),

    #[error("Too many requests. Please try again later.")]
    TooManyRequests,

    #[error("An error occurred: {0}")]
    Upstream(String),
}
