//! Ordered first-success download across candidate URLs.

use tracing::{debug, info, warn};

use crate::domain::entities::{CandidateSource, RawAsset};
use crate::domain::errors::{PipelineError, PipelineResult};
use crate::domain::ports::MediaFetchPort;

/// Tries each candidate strictly in order and returns the first download
/// that succeeds with a non-empty body. Later candidates are never touched.
///
/// # Errors
/// Returns `NoCandidateAvailable` if every candidate fails or the source is
/// empty.
pub async fn fetch_first_success(
    fetcher: &dyn MediaFetchPort,
    candidates: &CandidateSource,
) -> PipelineResult<RawAsset> {
    for (index, candidate) in candidates.iter().enumerate() {
        debug!(index, url = %candidate.url, expected = %candidate.expected, "Trying candidate");

        match fetcher.fetch(&candidate.url).await {
            Ok(asset) if !asset.is_empty() => {
                info!(index, url = %candidate.url, size = asset.len(), "Candidate downloaded");
                return Ok(asset);
            }
            Ok(_) => {
                warn!(index, url = %candidate.url, "Candidate returned an empty body");
            }
            Err(e) => {
                warn!(index, url = %candidate.url, error = %e, "Candidate failed");
            }
        }
    }

    Err(PipelineError::NoCandidateAvailable {
        attempts: candidates.len(),
    })
}
