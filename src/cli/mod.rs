use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::parse_language_list;

pub mod prompt;

#[derive(Parser)]
#[command(
    name = "yt-captions",
    about = "yt-captions - Extract captions from YouTube videos",
    version,
    long_about = "Fetches the caption track of a YouTube video and prints it as plain text. Accepts any common YouTube URL or a bare 11-character video ID, and can save the result to captions_<id>.txt.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube URL or video ID (prompted for if not given)
    #[arg(value_name = "URL_OR_ID")]
    pub input: Option<String>,

    /// Preferred caption language, in order (repeatable or comma separated)
    #[arg(short, long = "lang", value_name = "LANG")]
    pub languages: Vec<String>,

    /// Save captions to captions_<id>.txt without asking
    #[arg(short, long)]
    pub save: bool,

    /// Path to a config file
    #[arg(long, value_name = "FILE", env = "YT_CAPTIONS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl Cli {
    /// Language codes from every `--lang` flag, flattened in order
    pub fn language_preference(&self) -> Vec<String> {
        self.languages
            .iter()
            .flat_map(|value| parse_language_list(value))
            .collect()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the active configuration
    Config {
        /// Print the active configuration (the default action)
        #[arg(long, conflicts_with = "init")]
        show: bool,

        /// Write a default config file to the user config directory
        #[arg(long)]
        init: bool,
    },

    /// List supported URL formats
    Formats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_input_and_languages() {
        let cli = Cli::try_parse_from([
            "yt-captions",
            "https://youtu.be/dQw4w9WgXcQ",
            "-l",
            "de,fr",
            "--lang",
            "en",
            "--save",
        ])
        .unwrap();

        assert_eq!(cli.input.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(cli.language_preference(), vec!["de", "fr", "en"]);
        assert!(cli.save);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["yt-captions"]).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.language_preference().is_empty());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["yt-captions", "formats"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Formats)));

        let cli = Cli::try_parse_from(["yt-captions", "config", "--init"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config { show: false, init: true })
        ));
    }

    #[test]
    fn test_config_show() {
        let cli = Cli::try_parse_from(["yt-captions", "config", "--show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config { show: true, init: false })
        ));

        let err = Cli::try_parse_from(["yt-captions", "config", "--show", "--init"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
