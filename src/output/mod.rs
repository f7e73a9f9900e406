use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::extractor::VideoId;
use crate::utils::separator;

/// Heading between the separator lines
const CAPTIONS_HEADER: &str = "CAPTIONS";

/// Name of the file a transcript is saved under
pub fn caption_file_name(video_id: &VideoId) -> String {
    format!("captions_{}.txt", video_id)
}

/// Transcript framed by separator lines, as printed to the console
pub fn format_for_console(transcript: &str) -> String {
    let line = separator();
    format!("{line}\n{CAPTIONS_HEADER}\n{line}\n{transcript}\n{line}")
}

/// Saved file contents: ID, watch URL, header block, then the raw transcript
pub fn format_for_file(video_id: &VideoId, transcript: &str) -> String {
    let line = separator();
    format!(
        "YouTube Video ID: {}\nURL: {}\n{line}\n{CAPTIONS_HEADER}\n{line}\n{}",
        video_id,
        video_id.watch_url(),
        transcript
    )
}

/// Print transcript to console
pub fn print_to_console(transcript: &str) {
    println!("{}", format_for_console(transcript));
}

/// Write `captions_<id>.txt` into `dir`, overwriting any existing file
pub fn save_to_file(dir: &Path, video_id: &VideoId, transcript: &str) -> Result<PathBuf> {
    let path = dir.join(caption_file_name(video_id));

    fs_err::write(&path, format_for_file(video_id, transcript))
        .context("Failed to save captions")?;

    tracing::info!("Saved captions to {}", path.display());
    Ok(path)
}
