//! Application layer with pipeline stages, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Pipeline stages.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{StickerSource, UploadedAttachment};
pub use services::{FitMode, Normalizer, NormalizerConfig};
pub use use_cases::NormalizeStickerUseCase;
