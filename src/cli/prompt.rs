//! Interactive console prompts.
//!
//! Reads run on the blocking pool so a Ctrl-C handler on the runtime can still
//! fire while the user is typing.

use anyhow::{Context, Result};
use console::{style, Term};
use std::io::BufRead;

use crate::utils::is_affirmative;

/// Print `prompt` and read one line. `None` means stdin is closed.
pub async fn read_line(prompt: &str) -> Result<Option<String>> {
    let prompt = prompt.to_string();

    tokio::task::spawn_blocking(move || -> Result<Option<String>> {
        let term = Term::stdout();
        term.write_str(&prompt)?;
        term.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    })
    .await
    .context("Prompt task failed")?
    .context("Failed to read from terminal")
}

/// Ask for a URL or ID until something non-blank is entered
pub async fn prompt_for_input() -> Result<String> {
    let prompt = format!("{} ", style("Enter a YouTube URL or video ID:").bold());
    loop {
        match read_line(&prompt).await? {
            Some(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
            Some(_) => continue,
            None => anyhow::bail!("No YouTube URL or video ID provided"),
        }
    }
}

/// Ask whether to save; only `y` (any case) means yes, a closed stdin means no
pub async fn confirm_save() -> Result<bool> {
    let answer = read_line("\n💾 Save to file? (y/n): ").await?;
    Ok(answer.as_deref().is_some_and(is_affirmative))
}
