//! Content-based image format detection.
//!
//! The verdict comes from byte signatures only. Claimed content types are
//! never consulted, and a filename only contributes a hint when no signature
//! matched.

use crate::domain::entities::{ImageFormat, SniffResult};

use super::gif_frames;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const GIF_SIGNATURE: [u8; 4] = *b"GIF8";
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const RIFF_TAG: [u8; 4] = *b"RIFF";
const WEBP_TAG: [u8; 4] = *b"WEBP";

const PNG_ANIMATION_CONTROL: [u8; 4] = *b"acTL";
const PNG_END: [u8; 4] = *b"IEND";

const WEBP_EXTENDED: [u8; 4] = *b"VP8X";
const WEBP_ANIMATION_FLAG: u8 = 0x02;

/// Sniffs format and animation from content alone.
#[must_use]
pub fn sniff(data: &[u8]) -> SniffResult {
    match detect_signature(data) {
        ImageFormat::Png => SniffResult::new(ImageFormat::Png, png_has_animation_control(data)),
        ImageFormat::Gif => SniffResult::new(ImageFormat::Gif, gif_frames::is_animated(data)),
        ImageFormat::WebP => SniffResult::new(ImageFormat::WebP, webp_is_animated(data)),
        ImageFormat::Jpeg => SniffResult::new(ImageFormat::Jpeg, false),
        ImageFormat::Unknown => SniffResult::unknown(),
    }
}

/// Sniffs content, recording a filename-derived hint when no signature
/// matched. The hint never affects the format or animation verdict.
#[must_use]
pub fn sniff_with_filename(data: &[u8], filename: Option<&str>) -> SniffResult {
    let mut result = sniff(data);
    if !result.format.is_known() {
        result.extension_hint = filename.and_then(ImageFormat::from_filename);
    }
    result
}

/// Matches the leading bytes against the signature table.
#[must_use]
pub fn detect_signature(data: &[u8]) -> ImageFormat {
    if data.starts_with(&PNG_SIGNATURE) {
        ImageFormat::Png
    } else if data.starts_with(&GIF_SIGNATURE) {
        ImageFormat::Gif
    } else if data.starts_with(&JPEG_SIGNATURE) {
        ImageFormat::Jpeg
    } else if data.len() >= 12 && data[0..4] == RIFF_TAG && data[8..12] == WEBP_TAG {
        ImageFormat::WebP
    } else {
        ImageFormat::Unknown
    }
}

/// Walks the PNG chunk list looking for an animation control chunk.
fn png_has_animation_control(data: &[u8]) -> bool {
    let mut pos = PNG_SIGNATURE.len();

    while let Some(header) = pos.checked_add(8).and_then(|end| data.get(pos..end)) {
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = &header[4..8];

        if kind == PNG_ANIMATION_CONTROL {
            return true;
        }
        if kind == PNG_END {
            return false;
        }

        // header + payload + CRC
        let Some(next) = pos.checked_add(12).and_then(|p| p.checked_add(len)) else {
            return false;
        };
        pos = next;
    }

    false
}

/// Checks the VP8X feature flags of an extended WebP.
fn webp_is_animated(data: &[u8]) -> bool {
    data.len() >= 21 && data[12..16] == WEBP_EXTENDED && data[20] & WEBP_ANIMATION_FLAG != 0
}
