use super::app_config::LogLevel;
use crate::application::FitMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "stickerforge",
    version,
    about = "Turns uploads and existing stickers into sticker-ready images",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// How static images are placed on the canvas.
    #[arg(long, value_enum, global = true)]
    pub fit: Option<FitArg>,

    /// Keep JPEG input as JPEG.
    #[arg(long, global = true)]
    pub preserve_jpeg: Option<bool>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline entry points.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a local image file.
    Normalize {
        /// Input image.
        file: PathBuf,

        /// Content type to claim for the upload.
        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,

        /// Where to write the sticker.
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
    /// Download an existing sticker by id and normalize it.
    Copy {
        /// Sticker snowflake id.
        sticker_id: String,

        /// Where to write the sticker.
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
}

/// CLI spelling of [`FitMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FitArg {
    /// Fit inside the canvas with padding.
    Contain,
    /// Fill the canvas and crop.
    Cover,
}

impl From<FitArg> for FitMode {
    fn from(arg: FitArg) -> Self {
        match arg {
            FitArg::Contain => Self::Contain,
            FitArg::Cover => Self::Cover,
        }
    }
}
