use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Languages tried, in order, when no preference is given
pub const FALLBACK_LANGUAGES: [&str; 6] = ["en", "es", "fr", "de", "it", "pt"];

/// File name looked up in the working directory before the user config dir
const LOCAL_CONFIG_FILE: &str = "yt-captions.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transcript selection settings
    pub transcript: TranscriptConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Where saved captions go
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Ordered language codes tried when no preference is given
    pub fallback_languages: Vec<String>,

    /// Preference used when no `--lang` flag is passed (empty means none)
    pub preferred_languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Origin the watch page and player API are requested from
    pub base_url: String,

    /// Accept-Language header sent to YouTube
    pub accept_language: String,

    /// User-Agent header sent to YouTube
    pub user_agent: String,

    /// Request timeout in seconds; unset means no local timeout
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for `captions_<id>.txt` files (current directory if unset)
    pub directory: Option<PathBuf>,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            fallback_languages: FALLBACK_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            preferred_languages: Vec::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            accept_language: "en-US".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from the first file found, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::config_path()? {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write configuration to the given path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Config file that would be read: local file first, then the user config dir
    pub fn config_path() -> Result<Option<PathBuf>> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Ok(Some(local_config));
        }

        Ok(Self::user_config_path())
    }

    /// Per-user config location, e.g. `~/.config/yt-captions/config.yaml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("yt-captions").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.transcript.fallback_languages.is_empty() {
            anyhow::bail!("transcript.fallback_languages must list at least one language");
        }

        if self.transcript.fallback_languages.iter().any(|l| l.trim().is_empty()) {
            anyhow::bail!("transcript.fallback_languages must not contain empty entries");
        }

        let base_url = Url::parse(&self.http.base_url)
            .with_context(|| format!("http.base_url is not a valid URL: {}", self.http.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("http.base_url must use http or https");
        }

        if self.http.timeout_secs == Some(0) {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Directory saved captions are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!(
            "  Fallback Languages: {}",
            self.transcript.fallback_languages.join(", ")
        );
        if self.transcript.preferred_languages.is_empty() {
            println!("  Preferred Languages: (none)");
        } else {
            println!(
                "  Preferred Languages: {}",
                self.transcript.preferred_languages.join(", ")
            );
        }
        println!("  Base URL: {}", self.http.base_url);
        println!("  Accept-Language: {}", self.http.accept_language);
        match self.http.timeout_secs {
            Some(secs) => println!("  HTTP Timeout: {}s", secs),
            None => println!("  HTTP Timeout: none"),
        }
        println!("  Output Directory: {}", self.output_dir().display());
    }
}
