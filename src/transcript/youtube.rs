use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::parser::parse_transcript_xml;
use super::{Segment, ServiceError, ServiceResult, TranscriptListing, TranscriptService, TranscriptTrack};
use crate::config::HttpConfig;
use crate::extractor::VideoId;

const WATCH_PATH: &str = "watch";
const INNERTUBE_PLAYER_PATH: &str = "youtubei/v1/player";
const CONSENT_FORM_MARKER: &str = "action=\"https://consent.youtube.com/s\"";

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid api key pattern")
});

static CONSENT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="v" value="(.*?)""#).expect("valid consent pattern"));

/// Transcript service backed by YouTube's watch page and innertube player API
pub struct YoutubeTranscriptService {
    client: reqwest::Client,
    base_url: Url,
}

impl YoutubeTranscriptService {
    pub fn new(http: &HttpConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&http.accept_language).context("Invalid accept_language")?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&http.user_agent).context("Invalid user_agent")?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().context("Failed to create HTTP client")?;
        let base_url = Url::parse(&http.base_url).context("Invalid base_url")?;

        Ok(Self { client, base_url })
    }

    /// Resolve a path against the configured origin and append query parameters
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> ServiceResult<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ServiceError::Http(format!("invalid URL for {}: {}", path, e)))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Fetch the watch page, passing the EU consent interstitial if shown
    async fn fetch_video_html(&self, video_id: &VideoId) -> ServiceResult<String> {
        let url = self.endpoint(WATCH_PATH, &[("v", video_id.as_str())])?;
        tracing::debug!("Fetching watch page: {}", url);

        let html = self.get_text(self.client.get(url.clone())).await?;
        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        tracing::warn!("Consent page returned for {}, retrying with consent cookie", video_id);
        let value = consent_value(&html)?;
        let html = self
            .get_text(
                self.client
                    .get(url)
                    .header(COOKIE, format!("CONSENT=YES+{}", value)),
            )
            .await?;

        if html.contains(CONSENT_FORM_MARKER) {
            return Err(ServiceError::Unparsable(
                "consent page still shown after accepting".to_string(),
            ));
        }

        Ok(html)
    }

    async fn fetch_player_data(&self, video_id: &VideoId, api_key: &str) -> ServiceResult<Value> {
        let url = self.endpoint(INNERTUBE_PLAYER_PATH, &[("key", api_key)])?;

        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id.as_str()
        });

        tracing::debug!("Requesting player data for {}", video_id);
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Http(format!("failed to fetch player data: {}", e)))?;
        check_status(response.status())?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Unparsable(format!("player response: {}", e)))
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> ServiceResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        check_status(response.status())?;

        response
            .text()
            .await
            .map_err(|e| ServiceError::Http(format!("failed to read response: {}", e)))
    }
}

#[async_trait]
impl TranscriptService for YoutubeTranscriptService {
    async fn list_transcripts(&self, video_id: &VideoId) -> ServiceResult<TranscriptListing> {
        let html = self.fetch_video_html(video_id).await?;
        let api_key = extract_api_key(&html)?;
        let player = self.fetch_player_data(video_id, &api_key).await?;

        check_playability(&player)?;
        parse_caption_tracks(&player)
    }

    async fn fetch_transcript(&self, track: &TranscriptTrack) -> ServiceResult<Vec<Segment>> {
        if track.base_url.contains("&exp=xpe") {
            return Err(ServiceError::Unplayable(
                "caption track requires a proof-of-origin token".to_string(),
            ));
        }

        tracing::debug!("Fetching {} caption track", track.language_code);
        let xml = self.get_text(self.client.get(&track.base_url)).await?;

        parse_transcript_xml(&xml)
    }
}

fn check_status(status: StatusCode) -> ServiceResult<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceError::TooManyRequests);
    }
    if !status.is_success() {
        return Err(ServiceError::Http(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }
    Ok(())
}

fn consent_value(html: &str) -> ServiceResult<String> {
    CONSENT_VALUE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ServiceError::Unparsable("consent form without a value".to_string()))
}

/// Pull the innertube API key out of the watch page
fn extract_api_key(html: &str) -> ServiceResult<String> {
    if html.contains("g-recaptcha") {
        return Err(ServiceError::TooManyRequests);
    }

    API_KEY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ServiceError::Unparsable("INNERTUBE_API_KEY not found".to_string()))
}

fn check_playability(player: &Value) -> ServiceResult<()> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability["status"].as_str().unwrap_or("");
    let reason = playability["reason"].as_str().unwrap_or("");

    match status {
        "OK" => Ok(()),
        "LOGIN_REQUIRED" if reason.contains("not a bot") => Err(ServiceError::TooManyRequests),
        "ERROR" if reason.contains("unavailable") => Err(ServiceError::VideoUnavailable),
        _ => Err(ServiceError::Unplayable(if reason.is_empty() {
            status.to_string()
        } else {
            reason.to_string()
        })),
    }
}

/// Build the track listing from the player response, keeping upstream order
fn parse_caption_tracks(player: &Value) -> ServiceResult<TranscriptListing> {
    let tracks: Vec<TranscriptTrack> = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .map(|tracks| tracks.iter().filter_map(parse_track).collect())
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(ServiceError::TranscriptsDisabled);
    }

    Ok(TranscriptListing::new(tracks))
}

fn parse_track(caption: &Value) -> Option<TranscriptTrack> {
    let language_code = caption["languageCode"].as_str()?.to_string();
    let base_url = caption["baseUrl"].as_str()?.replace("&fmt=srv3", "");

    let language = caption
        .pointer("/name/runs/0/text")
        .or_else(|| caption.pointer("/name/simpleText"))
        .and_then(Value::as_str)
        .unwrap_or(&language_code)
        .to_string();

    Some(TranscriptTrack {
        is_generated: caption["kind"].as_str() == Some("asr"),
        language_code,
        language,
        base_url,
    })
}
