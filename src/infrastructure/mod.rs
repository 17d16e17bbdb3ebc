//! Infrastructure layer with external service adapters.

/// Media CDN downloads.
pub mod cdn;
/// Application configuration.
pub mod config;

pub use cdn::{HttpMediaFetcher, MediaFetcherConfig};
pub use config::{AppConfig, CliArgs, Command, LogLevel, PipelineConfig, StorageManager};
