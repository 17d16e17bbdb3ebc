//! Sticker normalization use case: fetch, sniff, normalize.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{StickerSource, UploadedAttachment};
use crate::application::services::{Normalizer, fetch_first_success, sniff_with_filename};
use crate::domain::entities::{CandidateSource, NormalizedAsset, RawAsset};
use crate::domain::errors::{PipelineError, PipelineResult};
use crate::domain::ports::MediaFetchPort;

/// Runs one sticker request end to end.
///
/// Stages run sequentially and each stage's error is returned unchanged.
/// Nothing is retried here.
#[derive(Clone)]
pub struct NormalizeStickerUseCase {
    fetch_port: Arc<dyn MediaFetchPort>,
    normalizer: Normalizer,
}

impl NormalizeStickerUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(fetch_port: Arc<dyn MediaFetchPort>, normalizer: Normalizer) -> Self {
        Self {
            fetch_port,
            normalizer,
        }
    }

    /// Executes the pipeline for the given source.
    ///
    /// # Errors
    /// Returns the error of the first stage that failed.
    pub async fn execute(&self, source: StickerSource) -> PipelineResult<NormalizedAsset> {
        debug!(source = %source, "Starting sticker pipeline");

        let raw = match source {
            StickerSource::Upload(attachment) => self.accept_upload(attachment)?,
            StickerSource::Copy(candidates) => self.download(&candidates).await?,
        };

        let asset = self.normalize(raw).await?;

        info!(
            format = %asset.format(),
            size = asset.byte_len(),
            "Sticker pipeline finished"
        );
        Ok(asset)
    }

    /// Cheap rejection of uploads from their claimed metadata.
    fn accept_upload(&self, attachment: UploadedAttachment) -> PipelineResult<RawAsset> {
        if !attachment.has_accepted_content_type() {
            let claimed = attachment
                .content_type
                .unwrap_or_else(|| "none".to_string());
            warn!(content_type = %claimed, "Upload rejected by content type");
            return Err(PipelineError::unsupported(format!(
                "content type {claimed} is not accepted"
            )));
        }

        let max = self.normalizer.config().max_input_bytes;
        let size = attachment.effective_size();
        if size > max {
            warn!(size, max, "Upload rejected by size");
            return Err(PipelineError::too_large(size, max));
        }

        Ok(attachment.into_raw_asset())
    }

    async fn download(&self, candidates: &CandidateSource) -> PipelineResult<RawAsset> {
        debug!(candidates = candidates.len(), "Downloading from candidates");
        fetch_first_success(self.fetch_port.as_ref(), candidates).await
    }

    async fn normalize(&self, raw: RawAsset) -> PipelineResult<NormalizedAsset> {
        let sniffed = sniff_with_filename(raw.bytes(), raw.filename());
        debug!(
            format = %sniffed.format,
            animated = sniffed.is_animated,
            claimed = raw.content_type().unwrap_or("none"),
            "Sniffed asset"
        );

        let normalizer = self.normalizer.clone();
        let bytes = raw.into_bytes();

        tokio::task::spawn_blocking(move || normalizer.normalize(&bytes, &sniffed))
            .await
            .map_err(|e| PipelineError::processing("normalization task panicked", e))?
    }
}
