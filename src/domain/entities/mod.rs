//! Domain entity definitions.

mod asset;
mod candidate;
mod sticker;

pub use asset::{ImageFormat, NormalizedAsset, RawAsset, SniffResult};
pub use candidate::{Candidate, CandidateSource};
pub use sticker::{StickerId, StickerName};
