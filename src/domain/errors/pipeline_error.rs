//! Sticker pipeline error types.

use std::fmt;

use thiserror::Error;

/// Boxed underlying cause.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for pipeline stages.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Coarse classification of a pipeline failure, for callers that map
/// failures to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineErrorKind {
    /// A single URL could not be downloaded.
    Download,
    /// Every ordered candidate failed.
    NoCandidateAvailable,
    /// Content could not be classified as a supported image.
    UnsupportedFormat,
    /// Byte ceiling exceeded.
    TooLarge,
    /// Decode, resize or encode failed.
    Processing,
}

impl fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Download => write!(f, "DownloadError"),
            Self::NoCandidateAvailable => write!(f, "NoCandidateAvailable"),
            Self::UnsupportedFormat => write!(f, "UnsupportedFormat"),
            Self::TooLarge => write!(f, "TooLarge"),
            Self::Processing => write!(f, "ProcessingError"),
        }
    }
}

/// Pipeline error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum PipelineError {
    #[error("failed to download {url}: {message}")]
    Download {
        url: String,
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("no candidate could be downloaded ({attempts} tried)")]
    NoCandidateAvailable { attempts: usize },

    #[error("unsupported image format: {reason}")]
    UnsupportedFormat { reason: String },

    #[error("asset is {size} bytes, limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("image processing failed: {message}")]
    Processing {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl PipelineError {
    /// Creates download error without an underlying cause.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates download error wrapping the transport error.
    #[must_use]
    pub fn download_with_cause(
        url: impl Into<String>,
        message: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Creates unsupported format error.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            reason: reason.into(),
        }
    }

    /// Creates too large error.
    #[must_use]
    pub const fn too_large(size: usize, max: usize) -> Self {
        Self::TooLarge { size, max }
    }

    /// Creates processing error wrapping the codec error.
    #[must_use]
    pub fn processing(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self::Processing {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Creates processing error without an underlying cause.
    #[must_use]
    pub fn processing_msg(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> PipelineErrorKind {
        match self {
            Self::Download { .. } => PipelineErrorKind::Download,
            Self::NoCandidateAvailable { .. } => PipelineErrorKind::NoCandidateAvailable,
            Self::UnsupportedFormat { .. } => PipelineErrorKind::UnsupportedFormat,
            Self::TooLarge { .. } => PipelineErrorKind::TooLarge,
            Self::Processing { .. } => PipelineErrorKind::Processing,
        }
    }

    /// Returns whether the failure came from the network.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Download { .. } | Self::NoCandidateAvailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            PipelineError::download("u", "x").kind(),
            PipelineErrorKind::Download
        );
        assert_eq!(
            PipelineError::too_large(2, 1).kind(),
            PipelineErrorKind::TooLarge
        );
        assert_eq!(
            PipelineError::NoCandidateAvailable { attempts: 4 }.kind(),
            PipelineErrorKind::NoCandidateAvailable
        );
    }

    #[test]
    fn test_processing_error_keeps_cause() {
        let cause = std::io::Error::other("disk on fire");
        let err = PipelineError::processing("encode failed", cause);

        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk on fire"));
        assert!(err.to_string().contains("encode failed"));
    }

    #[test]
    fn test_predicates() {
        assert!(PipelineError::NoCandidateAvailable { attempts: 1 }.is_network_error());
        assert!(!PipelineError::unsupported("text").is_network_error());
    }

    #[test]
    fn test_too_large_message() {
        let err = PipelineError::too_large(600_000, 512_000);
        assert_eq!(
            err.to_string(),
            "asset is 600000 bytes, limit is 512000 bytes"
        );
    }
}
