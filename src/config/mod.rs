//! Configuration management for dirscout.
//!
//! Configuration is read from `~/.config/dirscout/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::matcher::MatcherConfig;
use crate::scraper::ScraperConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub matcher: MatcherConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/dirscout/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("dirscout").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# dirscout configuration
#
# Every key is optional; anything left out falls back to the value shown here.

[scraper]
# Site the directory lives on; root-relative links are prefixed with this
origin = "https://www.lusha.com"

# Top-level page listing industries
directory_url = "https://www.lusha.com/company-search/"

# Directory links must contain this path segment
directory_path = "/company-search/"

# Run browser in headless mode (no visible window)
headless = true

# Page load timeout in seconds
timeout_secs = 60

# Wait after navigation and after each pagination click (milliseconds)
settle_delay_ms = 3000

# Anchor selectors, tried in order; the first one matching anything is used
directory_selectors = [".directory-content-box-col a", "main a"]
listing_selectors = [".directory-content-box a", "main a"]

# Cookie banner accept button on listing pages
cookie_accept_selector = "button#onetrust-accept-btn-handler"

# Text of the "next page" control, tried in order
next_labels = ["Next", ">"]

# Link texts that are never companies (case-insensitive)
excluded_texts = [
    "Privacy Policy",
    "Terms of Use",
    "Start for free",
    "Login",
    "Sign Up",
    "About Us",
    "Contact",
    "Lusha",
    "Twitter",
    "Facebook",
    "LinkedIn",
    "Instagram",
]

# Shortest accepted link text
min_name_len = 2

# Companies to collect per search unless --max is given
max_results = 50

[matcher]
# Chat model used for scoring
model = "gpt-4o"

# Companies per request in batch mode
batch_size = 20

# "single" (one request per company) or "batch"
mode = "single"

# Alternative OpenAI-compatible endpoint
# api_base = "https://api.openai.com/v1"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
