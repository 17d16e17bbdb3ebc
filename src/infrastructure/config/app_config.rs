//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::services::normalizer::{
    DEFAULT_CANVAS_SIZE, DEFAULT_MAX_BYTES, DEFAULT_MAX_INPUT_BYTES,
};
use crate::application::{FitMode, NormalizerConfig};

const APP_NAME: &str = "stickerforge";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Largest accepted canvas edge in pixels.
pub const MAX_CANVAS_SIZE: u32 = 4096;

/// Longest accepted per-request timeout in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Browser-like client identifier; some CDNs silently block unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default media CDN serving sticker assets.
pub const DEFAULT_CDN_BASE_URL: &str = "https://media.discordapp.net";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Pipeline limits and network settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Encoded sticker ceiling in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Largest input accepted for processing, also caps downloads.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Static sticker canvas edge in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,

    /// How static images are placed on the canvas.
    #[serde(default)]
    pub fit: FitMode,

    /// Keep JPEG input as JPEG.
    #[serde(default)]
    pub preserve_jpeg: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// `User-Agent` sent with every download.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the sticker CDN.
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

fn default_canvas_size() -> u32 {
    DEFAULT_CANVAS_SIZE
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_cdn_base_url() -> String {
    DEFAULT_CDN_BASE_URL.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            max_input_bytes: default_max_input_bytes(),
            canvas_size: default_canvas_size(),
            fit: FitMode::default(),
            preserve_jpeg: false,
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            cdn_base_url: default_cdn_base_url(),
        }
    }
}

impl PipelineConfig {
    /// Returns the normalizer view of this configuration.
    #[must_use]
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            max_bytes: self.max_bytes,
            max_input_bytes: self.max_input_bytes,
            canvas_size: self.canvas_size,
            fit: self.fit,
            preserve_jpeg: self.preserve_jpeg,
        }
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks limits and network settings for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CANVAS_SIZE).contains(&self.canvas_size) {
            return Err(ConfigError::invalid(
                "canvas_size",
                format!("must be between 1 and {MAX_CANVAS_SIZE}"),
            ));
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::invalid("max_bytes", "must be positive"));
        }
        if self.max_bytes > self.max_input_bytes {
            return Err(ConfigError::invalid(
                "max_bytes",
                format!("must not exceed max_input_bytes ({})", self.max_input_bytes),
            ));
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ConfigError::invalid(
                "request_timeout_secs",
                format!("must be between 1 and {MAX_REQUEST_TIMEOUT_SECS}"),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("user_agent", "must not be empty"));
        }
        let url = self.cdn_base_url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::invalid("cdn_base_url", "must be an http(s) URL"));
        }
        Ok(())
    }
}

use super::args::CliArgs;
use super::storage::ConfigError;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(fit) = args.fit {
            self.pipeline.fit = fit.into();
        }
        if let Some(preserve_jpeg) = args.preserve_jpeg {
            self.pipeline.preserve_jpeg = preserve_jpeg;
        }
        if let Some(timeout) = args.timeout {
            self.pipeline.request_timeout_secs = timeout;
        }
    }

    /// Checks the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a pipeline setting is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            pipeline: PipelineConfig::default(),
        }
    }
}
