//! Pipeline configuration.
//!
//! Limits are enforced before any per-request work starts, and the
//! dictionary settings are fixed for the life of the process.

use crate::lexicon::{LexiconConfig, LexiconError};
use crate::words::{RankingError, ScoringWeights};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-request limits and output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Largest accepted image, in pixels.
    pub max_pixels: u64,
    /// Maximum number of ranked words returned.
    pub top_n: usize,
    /// Shortest word reported. Cannot go below the dictionary minimum.
    pub min_word_length: usize,
    /// Return the generated letter string alongside the words.
    pub include_letter_string: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            max_pixels: 25_000_000, // 5000 x 5000
            top_n: 10,
            min_word_length: 3,
            include_letter_string: false,
        }
    }
}

impl RequestOptions {
    /// Validates the limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pixels == 0 {
            return Err(ConfigError::InvalidLimits("max_pixels must be positive".into()));
        }
        if self.min_word_length == 0 {
            return Err(ConfigError::InvalidLimits(
                "min_word_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Letter encoding and scan tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Cap on repeated-letter runs; unset keeps one letter per pixel.
    pub max_run_length: Option<usize>,
    /// Pixels per parallel encoding unit.
    pub chunk_pixels: usize,
    /// Letters per parallel scan chunk.
    pub scan_chunk_len: usize,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            max_run_length: None,
            chunk_pixels: 1 << 16,
            scan_chunk_len: 1 << 18,
        }
    }
}

impl EncodingConfig {
    /// Validates the tuning values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_run_length == Some(0) {
            return Err(ConfigError::InvalidLimits(
                "max_run_length must be at least 1 when set".into(),
            ));
        }
        if self.chunk_pixels == 0 || self.scan_chunk_len == 0 {
            return Err(ConfigError::InvalidLimits("chunk sizes must be positive".into()));
        }
        Ok(())
    }
}

/// Output and exporter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Host the HTTP server binds to.
    pub host: String,
    /// HTTP server port (0 to disable).
    pub port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Environment variable that overrides `[output].host`.
pub const HOST_ENV: &str = "HOST";
/// Environment variable that overrides `[output].port`.
pub const PORT_ENV: &str = "PORT";

impl OutputConfig {
    /// Applies `HOST` and `PORT` from the environment over the file values.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(std::env::var(HOST_ENV).ok(), std::env::var(PORT_ENV).ok())
    }

    /// Applies explicit host and port overrides; empty values are ignored.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv(format!("{PORT_ENV}={port} is not a port")))?;
        }
        Ok(self)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error("invalid limits: {0}")]
    InvalidLimits(String),
    #[error("invalid environment override: {0}")]
    InvalidEnv(String),
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub dictionary: LexiconConfig,
    #[serde(default)]
    pub limits: RequestOptions,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub ranking: ScoringWeights,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dictionary.validate()?;
        self.limits.validate()?;
        self.encoding.validate()?;
        self.ranking.validate()?;
        if self.limits.min_word_length < self.dictionary.min_word_length {
            return Err(ConfigError::InvalidLimits(format!(
                "limits.min_word_length {} is below dictionary.min_word_length {}",
                self.limits.min_word_length, self.dictionary.min_word_length
            )));
        }
        Ok(())
    }
}
