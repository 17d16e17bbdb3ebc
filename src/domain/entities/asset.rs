//! Image asset value objects flowing through the normalization pipeline.

use std::fmt;
use std::path::Path;

use bytes::Bytes;

/// Image container format as detected from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Portable Network Graphics (including APNG).
    Png,
    /// JPEG / JFIF.
    Jpeg,
    /// Graphics Interchange Format.
    Gif,
    /// RIFF WebP.
    WebP,
    /// No known signature matched.
    #[default]
    Unknown,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Returns the canonical file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Unknown => "bin",
        }
    }

    /// Classifies a file extension (case-insensitive, without dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "apng" => Some(Self::Png),
            "jpg" | "jpeg" | "jfif" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Classifies a filename by its extension.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parses a MIME type. `image/jpg` is accepted as an alias.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps to the `image` crate format used for decoding.
    #[must_use]
    pub const fn to_codec(self) -> Option<image::ImageFormat> {
        match self {
            Self::Png => Some(image::ImageFormat::Png),
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Gif => Some(image::ImageFormat::Gif),
            Self::WebP => Some(image::ImageFormat::WebP),
            Self::Unknown => None,
        }
    }

    /// Returns true when a signature was recognized.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
            Self::Gif => write!(f, "GIF"),
            Self::WebP => write!(f, "WEBP"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Raw bytes as received from an upload or a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset {
    bytes: Bytes,
    content_type: Option<String>,
    filename: Option<String>,
}

impl RawAsset {
    /// Creates an asset with no metadata.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            filename: None,
        }
    }

    /// Attaches the claimed content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attaches the claimed filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Returns the content bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the claimed content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the claimed filename, if any.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Returns the byte length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the asset holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the asset and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Verdict of content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SniffResult {
    /// Format derived from the byte signature alone.
    pub format: ImageFormat,
    /// True if the container holds more than one frame.
    pub is_animated: bool,
    /// Format suggested by the filename when no signature matched.
    pub extension_hint: Option<ImageFormat>,
}

impl SniffResult {
    /// Creates a result for a recognized signature.
    #[must_use]
    pub const fn new(format: ImageFormat, is_animated: bool) -> Self {
        Self {
            format,
            is_animated,
            extension_hint: None,
        }
    }

    /// Result for bytes with no recognizable signature.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(ImageFormat::Unknown, false)
    }
}

/// Pipeline output ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAsset {
    bytes: Bytes,
    format: ImageFormat,
}

impl NormalizedAsset {
    /// Wraps encoded output bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, format: ImageFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the output format.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the encoded byte length.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Consumes the asset and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("sticker.PNG", Some(ImageFormat::Png) ; "upper_png")]
    #[test_case("photo.jpeg", Some(ImageFormat::Jpeg) ; "jpeg")]
    #[test_case("anim.gif", Some(ImageFormat::Gif) ; "gif")]
    #[test_case("x.webp", Some(ImageFormat::WebP) ; "webp")]
    #[test_case("notes.txt", None ; "text")]
    #[test_case("no_extension", None ; "bare")]
    fn test_from_filename(name: &str, expected: Option<ImageFormat>) {
        assert_eq!(ImageFormat::from_filename(name), expected);
    }

    #[test_case(ImageFormat::Png ; "png")]
    #[test_case(ImageFormat::Jpeg ; "jpeg")]
    #[test_case(ImageFormat::Gif ; "gif")]
    #[test_case(ImageFormat::WebP ; "webp")]
    fn test_known_formats_claim_an_accepted_mime(format: ImageFormat) {
        assert_eq!(ImageFormat::from_mime(format.mime_type()), Some(format));
    }

    #[test]
    fn test_unknown_format_claims_no_image_type() {
        assert_eq!(ImageFormat::from_mime(ImageFormat::Unknown.mime_type()), None);
    }

    #[test]
    fn test_from_mime_accepts_jpg_alias_and_parameters() {
        assert_eq!(ImageFormat::from_mime("image/jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::from_mime("image/png; charset=binary"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_mime("text/plain"), None);
    }

    #[test]
    fn test_normalized_asset_reports_length() {
        let asset = NormalizedAsset::new(vec![1u8, 2, 3], ImageFormat::Png);
        assert_eq!(asset.byte_len(), 3);
        assert_eq!(asset.format(), ImageFormat::Png);
    }

    #[test]
    fn test_raw_asset_metadata() {
        let asset = RawAsset::new(vec![0u8; 4])
            .with_content_type("image/gif")
            .with_filename("a.gif");
        assert_eq!(asset.content_type(), Some("image/gif"));
        assert_eq!(asset.filename(), Some("a.gif"));
        assert_eq!(asset.len(), 4);
        assert!(!asset.is_empty());
    }
}
