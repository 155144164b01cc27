use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::fetcher::{DEFAULT_ACCEPT, DEFAULT_MAX_FILENAME_CHARS, DEFAULT_TIMEOUT};
use crate::file_utils::DEFAULT_FILENAME;
use crate::subtitle_processor::SubtitleFormat;

/// Application configuration module
/// This module handles loading, validating and saving the settings of the
/// downloader. Every field has a default, so a partial conf.json is valid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Subtitle request settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for subtitle requests
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FetchConfig {
    // @field: Request time budget in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Accept header for timed-text requests
    #[serde(default = "default_accept")]
    pub accept: String,

    // @field: Optional User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            accept: default_accept(),
            user_agent: None,
        }
    }
}

/// Settings for produced files
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Directory files are saved into
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    // @field: Maximum characters kept from the video title
    #[serde(default = "default_max_filename_chars")]
    pub max_filename_chars: usize,

    // @field: Title used when none can be resolved
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,

    // @field: Format used when none is requested
    #[serde(default)]
    pub default_format: SubtitleFormat,

    // @field: Replace existing files
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            max_filename_chars: default_max_filename_chars(),
            fallback_title: default_fallback_title(),
            default_format: SubtitleFormat::default(),
            overwrite: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_output_directory() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_max_filename_chars() -> usize {
    DEFAULT_MAX_FILENAME_CHARS
}

fn default_fallback_title() -> String {
    DEFAULT_FILENAME.to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            return Err(anyhow!("fetch.timeout_secs must be greater than zero"));
        }

        if self.fetch.accept.trim().is_empty() {
            return Err(anyhow!("fetch.accept must not be empty"));
        }

        if self.output.max_filename_chars == 0 {
            return Err(anyhow!("output.max_filename_chars must be greater than zero"));
        }

        if self.output.fallback_title.trim().is_empty() {
            return Err(anyhow!("output.fallback_title must not be empty"));
        }

        Ok(())
    }

    /// Read a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Read the configuration, writing a default one first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
