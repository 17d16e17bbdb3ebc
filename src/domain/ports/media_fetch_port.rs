//! Port definition for downloading remote media.

use async_trait::async_trait;

use crate::domain::entities::RawAsset;
use crate::domain::errors::PipelineResult;

/// Port for single-URL media downloads.
///
/// Implementations perform exactly one request per call and never retry;
/// ordered fallback across several URLs lives above this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFetchPort: Send + Sync {
    /// Downloads the resource at `url`.
    ///
    /// Fails with a download error on transport failure, timeout, a non-2xx
    /// status or an empty body.
    async fn fetch(&self, url: &str) -> PipelineResult<RawAsset>;
}
