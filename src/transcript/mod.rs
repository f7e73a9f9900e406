use async_trait::async_trait;

use crate::config::FALLBACK_LANGUAGES;
use crate::extractor::VideoId;
use crate::CaptionError;

pub mod parser;
pub mod youtube;

pub use youtube::YoutubeTranscriptService;

/// One timed caption unit as returned upstream
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Caption text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// A caption track available for a video
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptTrack {
    /// Language code, e.g. `en` or `pt-BR`
    pub language_code: String,

    /// Human readable language name
    pub language: String,

    /// Automatic speech recognition track
    pub is_generated: bool,

    /// Where the track content is fetched from
    pub base_url: String,
}

/// All tracks available for one video, in upstream order
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptListing {
    pub tracks: Vec<TranscriptTrack>,
}

impl TranscriptListing {
    pub fn new(tracks: Vec<TranscriptTrack>) -> Self {
        Self { tracks }
    }

    pub fn language_codes(&self) -> Vec<&str> {
        self.tracks
            .iter()
            .map(|track| track.language_code.as_str())
            .collect()
    }
}

/// Conditions reported by a transcript service
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("transcripts are disabled")]
    TranscriptsDisabled,

    #[error("no transcript in any of the requested languages: {}", .0.join(", "))]
    NoTranscriptFound(Vec<String>),

    #[error("video is unavailable")]
    VideoUnavailable,

    #[error("too many requests")]
    TooManyRequests,

    #[error("video is unplayable: {0}")]
    Unplayable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("could not parse YouTube response: {0}")]
    Unparsable(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Source of caption tracks for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptService: Send + Sync {
    /// List every track available for the video
    async fn list_transcripts(&self, video_id: &VideoId) -> ServiceResult<TranscriptListing>;

    /// Fetch the segments of one track
    async fn fetch_transcript(&self, track: &TranscriptTrack) -> ServiceResult<Vec<Segment>>;

    /// Fetch the first track matching `languages`, in that order
    async fn fetch_in_languages(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> ServiceResult<Vec<Segment>> {
        let listing = self.list_transcripts(video_id).await?;
        let track = select_by_priority(&listing, languages)
            .ok_or_else(|| ServiceError::NoTranscriptFound(languages.to_vec()))?;
        self.fetch_transcript(track).await
    }
}

/// Pick the first track whose language appears in `languages`, walking
/// `languages` in order. For each code a manually created track beats a
/// generated one. Upstream listing order plays no part.
pub fn select_by_priority<'a, L: AsRef<str>>(
    listing: &'a TranscriptListing,
    languages: &[L],
) -> Option<&'a TranscriptTrack> {
    languages.iter().find_map(|code| {
        let code = code.as_ref();
        let mut matching = listing
            .tracks
            .iter()
            .filter(|track| track.language_code == code);
        let first = matching.clone().find(|track| !track.is_generated);
        first.or_else(|| matching.next())
    })
}

/// Join segment texts with a single space, keeping upstream order
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a service condition to the message shown for this video
pub fn translate_error(video_id: &VideoId, err: ServiceError) -> CaptionError {
    match err {
        ServiceError::TranscriptsDisabled => CaptionError::TranscriptsDisabled(video_id.clone()),
        ServiceError::NoTranscriptFound(_) => CaptionError::NoTranscriptFound(video_id.clone()),
        ServiceError::VideoUnavailable => CaptionError::VideoUnavailable(video_id.clone()),
        ServiceError::TooManyRequests => CaptionError::TooManyRequests,
        other => CaptionError::Upstream(other.to_string()),
    }
}

/// Retrieves transcript text for a video through a [`TranscriptService`]
pub struct TranscriptRetriever<S> {
    service: S,
    fallback_languages: Vec<String>,
}

impl<S: TranscriptService> TranscriptRetriever<S> {
    /// Create a retriever using [`FALLBACK_LANGUAGES`]
    pub fn new(service: S) -> Self {
        Self {
            service,
            fallback_languages: FALLBACK_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the languages tried when no preference is given
    pub fn with_fallback_languages(mut self, languages: Vec<String>) -> Self {
        self.fallback_languages = languages;
        self
    }

    /// Retrieve the transcript as one space-joined string.
    ///
    /// With a non-empty `languages` preference the service is asked directly in
    /// that order. Otherwise the available tracks are listed and the first one
    /// in fallback order is fetched.
    pub async fn retrieve(
        &self,
        video_id: &VideoId,
        languages: Option<&[String]>,
    ) -> std::result::Result<String, CaptionError> {
        let segments = self
            .retrieve_segments(video_id, languages)
            .await
            .map_err(|err| {
                tracing::debug!("Transcript retrieval for {} failed: {}", video_id, err);
                translate_error(video_id, err)
            })?;

        tracing::info!("Retrieved {} caption segments for {}", segments.len(), video_id);
        Ok(join_segments(&segments))
    }

    async fn retrieve_segments(
        &self,
        video_id: &VideoId,
        languages: Option<&[String]>,
    ) -> ServiceResult<Vec<Segment>> {
        match languages {
            Some(languages) if !languages.is_empty() => {
                tracing::debug!("Fetching {} in preferred languages: {:?}", video_id, languages);
                self.service.fetch_in_languages(video_id, languages).await
            }
            _ => {
                let listing = self.service.list_transcripts(video_id).await?;
                tracing::debug!(
                    "Available transcripts for {}: {:?}",
                    video_id,
                    listing.language_codes()
                );

                let track = select_by_priority(&listing, self.fallback_languages.as_slice())
                    .ok_or_else(|| ServiceError::NoTranscriptFound(self.fallback_languages.clone()))?;
                tracing::debug!(
                    "Selected {} transcript ({})",
                    track.language_code,
                    if track.is_generated { "generated" } else { "manual" }
                );

                self.service.fetch_transcript(track).await
            }
        }
    }
}
