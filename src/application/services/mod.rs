//! Pipeline stages.

pub mod candidate_fetcher;
pub mod format_sniffer;
pub mod gif_frames;
pub mod normalizer;

pub use candidate_fetcher::fetch_first_success;
pub use format_sniffer::{sniff, sniff_with_filename};
pub use normalizer::{FitMode, Normalizer, NormalizerConfig};
