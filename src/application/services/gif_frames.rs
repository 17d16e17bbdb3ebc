//! GIF block walker.
//!
//! Counts image descriptors by following the block structure (header,
//! logical screen descriptor, colour tables, extensions and LZW sub-blocks)
//! instead of scanning for the `0x2C` separator byte, which also occurs
//! inside palettes and compressed pixel data.

const HEADER_LEN: usize = 6;
const SCREEN_DESCRIPTOR_LEN: usize = 7;
const IMAGE_DESCRIPTOR_LEN: usize = 9;

const IMAGE_SEPARATOR: u8 = 0x2C;
const EXTENSION_INTRODUCER: u8 = 0x21;

const COLOR_TABLE_FLAG: u8 = 0x80;
const COLOR_TABLE_SIZE_MASK: u8 = 0x07;

/// Counts frames, stopping early once `limit` frames have been seen.
///
/// Truncated or malformed streams yield the number of complete image
/// descriptors found before the damage.
#[must_use]
pub fn count_frames(data: &[u8], limit: usize) -> usize {
    let mut reader = BlockReader { data, pos: 0 };
    let mut frames = 0;

    if !reader.skip(HEADER_LEN) {
        return 0;
    }

    let Some(screen) = reader.take(SCREEN_DESCRIPTOR_LEN) else {
        return 0;
    };
    if !reader.skip(color_table_len(screen[4])) {
        return 0;
    }

    while frames < limit {
        let Some(introducer) = reader.next_byte() else {
            break;
        };

        match introducer {
            IMAGE_SEPARATOR => {
                let Some(descriptor) = reader.take(IMAGE_DESCRIPTOR_LEN) else {
                    break;
                };
                if !reader.skip(color_table_len(descriptor[8])) {
                    break;
                }
                // LZW minimum code size
                if !reader.skip(1) || !reader.skip_sub_blocks() {
                    break;
                }
                frames += 1;
            }
            EXTENSION_INTRODUCER => {
                if !reader.skip(1) || !reader.skip_sub_blocks() {
                    break;
                }
            }
            // trailer, or a block we cannot interpret
            _ => break,
        }
    }

    frames
}

/// Returns true if the stream holds at least two frames.
#[must_use]
pub fn is_animated(data: &[u8]) -> bool {
    count_frames(data, 2) >= 2
}

fn color_table_len(packed: u8) -> usize {
    if packed & COLOR_TABLE_FLAG == 0 {
        0
    } else {
        3 * (1 << ((packed & COLOR_TABLE_SIZE_MASK) + 1))
    }
}

struct BlockReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn skip(&mut self, len: usize) -> bool {
        self.take(len).is_some()
    }

    /// Skips a chain of length-prefixed sub-blocks up to the zero terminator.
    fn skip_sub_blocks(&mut self) -> bool {
        loop {
            match self.next_byte() {
                Some(0) => return true,
                Some(len) => {
                    if !self.skip(usize::from(len)) {
                        return false;
                    }
                }
                None => return false,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Builds a minimal GIF89a with `frames` 1x1 frames and a global palette.
    ///
    /// Palette entries contain `0x2C` bytes so separator-counting heuristics
    /// would over-count.
    pub fn gif_with_frames(frames: usize) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"GIF89a");
        // 1x1 screen, global colour table of 2 entries
        data.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00]);
        data.extend_from_slice(&[0x2C, 0x2C, 0x2C, 0xFF, 0xFF, 0xFF]);
        // NETSCAPE looping extension
        data.extend_from_slice(&[0x21, 0xFF, 0x0B]);
        data.extend_from_slice(b"NETSCAPE2.0");
        data.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);

        for _ in 0..frames {
            // graphic control extension
            data.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]);
            // image descriptor 1x1 at origin, no local table
            data.extend_from_slice(&[0x2C, 0, 0, 0, 0, 0x01, 0x00, 0x01, 0x00, 0x00]);
            // LZW min code size 2, one data sub-block, terminator
            data.extend_from_slice(&[0x02, 0x02, 0x44, 0x01, 0x00]);
        }

        data.push(0x3B);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::gif_with_frames;
    use super::*;

    #[test]
    fn test_single_frame_is_static() {
        let gif = gif_with_frames(1);
        assert_eq!(count_frames(&gif, usize::MAX), 1);
        assert!(!is_animated(&gif));
    }

    #[test]
    fn test_multiple_frames_are_animated() {
        let gif = gif_with_frames(3);
        assert_eq!(count_frames(&gif, usize::MAX), 3);
        assert!(is_animated(&gif));
    }

    #[test]
    fn test_palette_separator_bytes_are_not_frames() {
        let gif = gif_with_frames(1);
        let raw_separators = gif.iter().filter(|&&b| b == IMAGE_SEPARATOR).count();
        assert!(raw_separators > 1);
        assert!(!is_animated(&gif));
    }

    #[test]
    fn test_truncated_stream_counts_complete_frames() {
        let gif = gif_with_frames(2);
        let truncated = &gif[..gif.len() - 4];
        assert_eq!(count_frames(truncated, usize::MAX), 1);
    }

    #[test]
    fn test_limit_stops_early() {
        let gif = gif_with_frames(10);
        assert_eq!(count_frames(&gif, 2), 2);
    }

    #[test]
    fn test_garbage_yields_zero() {
        assert_eq!(count_frames(b"GIF8", usize::MAX), 0);
        assert_eq!(count_frames(&[], usize::MAX), 0);
    }

    #[test]
    fn test_encoder_output_is_parsed() {
        let img = image::DynamicImage::new_rgba8(4, 4);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Gif).unwrap();
        assert_eq!(count_frames(buf.get_ref(), usize::MAX), 1);
    }
}
