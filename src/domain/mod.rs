//! Domain layer with value objects, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{
    Candidate, CandidateSource, ImageFormat, NormalizedAsset, RawAsset, SniffResult, StickerId,
    StickerName,
};
pub use errors::{PipelineError, PipelineErrorKind, PipelineResult};
pub use ports::MediaFetchPort;
