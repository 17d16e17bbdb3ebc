//! Stickerforge - sticker ingestion pipeline.
//!
//! Accepts an uploaded image or an existing sticker, identifies its real
//! format from its bytes, and produces an asset that fits the platform's
//! sticker constraints. Animated inputs pass through untouched; static inputs
//! are resized onto a square canvas and re-encoded under a byte ceiling.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases, services and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "stickerforge";
