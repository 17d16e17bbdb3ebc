//! Sticker pipeline request DTOs.

use bytes::Bytes;

use crate::domain::entities::{CandidateSource, ImageFormat, RawAsset};

/// An attachment uploaded with a command, already held in memory.
#[derive(Debug, Clone)]
pub struct UploadedAttachment {
    /// Attachment bytes.
    pub bytes: Bytes,
    /// Content type claimed by the platform.
    pub content_type: Option<String>,
    /// Size claimed by the platform, which may differ from `bytes.len()`.
    pub claimed_size: Option<usize>,
    /// Original filename.
    pub filename: Option<String>,
}

impl UploadedAttachment {
    /// Creates an attachment with no claimed metadata.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            claimed_size: None,
            filename: None,
        }
    }

    /// Sets the claimed content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the claimed size.
    #[must_use]
    pub const fn with_claimed_size(mut self, size: usize) -> Self {
        self.claimed_size = Some(size);
        self
    }

    /// Sets the filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Returns true if the claimed content type is PNG, JPEG, GIF or WebP.
    /// An attachment without a claim is rejected.
    #[must_use]
    pub fn has_accepted_content_type(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(ImageFormat::from_mime)
            .is_some()
    }

    /// Largest of the claimed and actual sizes.
    #[must_use]
    pub fn effective_size(&self) -> usize {
        self.claimed_size.unwrap_or(0).max(self.bytes.len())
    }

    /// Converts into a raw asset, keeping the claimed metadata.
    #[must_use]
    pub fn into_raw_asset(self) -> RawAsset {
        let mut asset = RawAsset::new(self.bytes);
        if let Some(ct) = self.content_type {
            asset = asset.with_content_type(ct);
        }
        if let Some(name) = self.filename {
            asset = asset.with_filename(name);
        }
        asset
    }
}

/// Where the pipeline gets its input from.
#[derive(Debug, Clone)]
pub enum StickerSource {
    /// Direct upload: the buffer is already local.
    Upload(UploadedAttachment),
    /// Copy: download from the first reachable candidate.
    Copy(CandidateSource),
}

/// Description given to stickers added from an upload.
pub const UPLOAD_DESCRIPTION: &str = "Added via bot";

/// Description given to stickers copied from another server.
pub const COPY_DESCRIPTION: &str = "Copied via bot";

impl StickerSource {
    /// Description to attach when the caller supplies none.
    #[must_use]
    pub const fn default_description(&self) -> &'static str {
        match self {
            Self::Upload(_) => UPLOAD_DESCRIPTION,
            Self::Copy(_) => COPY_DESCRIPTION,
        }
    }

    /// Returns a short label for logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Upload(_) => "upload",
            Self::Copy(_) => "copy",
        }
    }
}

impl std::fmt::Display for StickerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
