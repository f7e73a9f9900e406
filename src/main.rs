use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_captions::cli::{prompt, Cli, Commands};
use yt_captions::config::Config;
use yt_captions::extractor::{extract_video_id, SUPPORTED_FORMATS};
use yt_captions::transcript::{TranscriptRetriever, YoutubeTranscriptService};
use yt_captions::{output, utils, CaptionError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let outcome = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\n⚠️  Operation cancelled by user.");
            std::process::exit(0);
        }
    };

    if let Err(err) = outcome {
        report_error(&err);
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose {
        "yt_captions=debug"
    } else {
        "yt_captions=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let languages = cli.language_preference();

    match cli.command {
        Some(Commands::Config { show, init }) => return config_command(&config, show, init),
        Some(Commands::Formats) => {
            print_formats();
            return Ok(());
        }
        None => {}
    }

    let input = match cli.input {
        Some(input) => input.trim().to_string(),
        None => prompt::prompt_for_input().await?,
    };

    let video_id =
        extract_video_id(&input).ok_or_else(|| CaptionError::InvalidInput(input.clone()))?;

    println!(
        "\n📹 Extracting captions for video ID: {}",
        style(&video_id).cyan()
    );

    let preference = if languages.is_empty() {
        config.transcript.preferred_languages.clone()
    } else {
        languages
    };

    let service = YoutubeTranscriptService::new(&config.http)?;
    let retriever = TranscriptRetriever::new(service)
        .with_fallback_languages(config.transcript.fallback_languages.clone());

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    };
    progress.set_message("Fetching captions...");

    let started = Instant::now();
    let result = retriever.retrieve(&video_id, Some(preference.as_slice())).await;
    progress.finish_and_clear();
    let transcript = result?;

    tracing::info!(
        "Fetched transcript for {} in {}",
        video_id,
        utils::format_duration(started.elapsed().as_secs_f64())
    );

    output::print_to_console(&transcript);

    if cli.save || prompt::confirm_save().await? {
        let path = output::save_to_file(&config.output_dir(), &video_id, &transcript)?;
        println!("✅ Captions saved to: {}", path.display());
    }

    Ok(())
}

/// `config` prints the active configuration unless `--init` is given
fn config_command(config: &Config, show: bool, init: bool) -> Result<()> {
    if show || !init {
        config.display();
        return Ok(());
    }

    let path = Config::user_config_path().context("Could not determine config directory")?;
    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    Config::default().save_to(&path)?;
    println!("Wrote default configuration to: {}", path.display());
    Ok(())
}

fn print_formats() {
    println!("Supported formats:");
    for format in SUPPORTED_FORMATS {
        println!("  • {}", format);
    }
}

fn report_error(err: &anyhow::Error) {
    eprintln!("\n{} {:#}", style("❌ Error:").red().bold(), err);

    if let Some(CaptionError::InvalidInput(_)) = err.downcast_ref::<CaptionError>() {
        eprintln!("Please provide a valid YouTube URL or video ID.");
        eprintln!("\nSupported formats:");
        for format in SUPPORTED_FORMATS {
            eprintln!("  - {}", format);
        }
        return;
    }

    eprintln!("\nPossible reasons:");
    eprintln!("  - Video doesn't have captions/subtitles enabled");
    eprintln!("  - Video is unavailable or private");
    eprintln!("  - Network connection issues");
}
