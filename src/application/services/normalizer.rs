//! Sticker normalization.
//!
//! Animated assets pass through untouched. Static assets are decoded, fitted
//! onto the exact sticker canvas and re-encoded, with a single stronger
//! pass (reduced colour depth for PNG, lower quality for JPEG) when the
//! first encode exceeds the byte ceiling. The smaller of the two encodes wins.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::entities::{ImageFormat, NormalizedAsset, SniffResult};
use crate::domain::errors::{PipelineError, PipelineResult};

/// Platform ceiling for an encoded sticker.
pub const DEFAULT_MAX_BYTES: usize = 512_000;

/// Largest input accepted for processing.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;

/// Static sticker canvas edge in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 320;

/// Upper bound on decoded dimensions, guards against decompression bombs.
const MAX_DECODE_DIMENSION: u32 = 16_384;

const JPEG_QUALITY: u8 = 90;
const JPEG_QUALITY_STRONG: u8 = 70;

/// Colour channels keep their top five bits on the strong PNG pass.
const STRONG_PNG_CHANNEL_MASK: u8 = 0xF8;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// How a static image is placed on the square canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit inside the canvas and pad the remainder.
    #[default]
    Contain,
    /// Scale to cover the canvas and crop the overflow around the centre.
    Cover,
}

/// Normalizer limits and output policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Ceiling for the encoded output and for animated pass-through.
    pub max_bytes: usize,
    /// Inputs larger than this are rejected before any decoding.
    pub max_input_bytes: usize,
    /// Square canvas edge for static output.
    pub canvas_size: u32,
    /// Canvas placement policy.
    pub fit: FitMode,
    /// Keep JPEG input as JPEG instead of converting to PNG.
    pub preserve_jpeg: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            canvas_size: DEFAULT_CANVAS_SIZE,
            fit: FitMode::default(),
            preserve_jpeg: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    Standard,
    Strong,
}

/// Turns sniffed bytes into an upload-ready sticker.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Creates a normalizer with the given limits.
    #[must_use]
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalizes `data` according to its sniffed format.
    ///
    /// # Errors
    /// Returns `TooLarge` when a ceiling is exceeded, `UnsupportedFormat` when
    /// the content cannot be classified, and `Processing` when decoding or
    /// encoding fails.
    pub fn normalize(&self, data: &Bytes, sniff: &SniffResult) -> PipelineResult<NormalizedAsset> {
        if data.len() > self.config.max_input_bytes {
            return Err(PipelineError::too_large(
                data.len(),
                self.config.max_input_bytes,
            ));
        }

        if sniff.is_animated {
            return self.pass_through(data, sniff.format);
        }

        if self.config.canvas_size == 0 {
            return Err(PipelineError::processing_msg("canvas size is zero"));
        }

        let (format, image) = match sniff.format {
            ImageFormat::Unknown => self.decode_hinted(data, sniff.extension_hint)?,
            format => (format, self.decode(data, format)?),
        };

        debug!(
            %format,
            width = image.width(),
            height = image.height(),
            "Fitting static image onto canvas"
        );

        self.encode_static(&image, format)
    }

    fn pass_through(&self, data: &Bytes, format: ImageFormat) -> PipelineResult<NormalizedAsset> {
        if !matches!(format, ImageFormat::Gif | ImageFormat::Png) {
            return Err(PipelineError::unsupported(format!(
                "animated {format} cannot be uploaded as a sticker"
            )));
        }

        if data.len() > self.config.max_bytes {
            warn!(
                size = data.len(),
                max = self.config.max_bytes,
                "Animated asset exceeds ceiling"
            );
            return Err(PipelineError::too_large(data.len(), self.config.max_bytes));
        }

        debug!(%format, size = data.len(), "Passing animated asset through unchanged");
        Ok(NormalizedAsset::new(data.clone(), format))
    }

    /// Decodes an unrecognized buffer using the filename hint, if the bytes
    /// actually are that format.
    fn decode_hinted(
        &self,
        data: &[u8],
        hint: Option<ImageFormat>,
    ) -> PipelineResult<(ImageFormat, DynamicImage)> {
        let Some(hint) = hint.filter(|h| h.is_known()) else {
            return Err(PipelineError::unsupported(
                "content matches no known image signature",
            ));
        };

        match self.decode(data, hint) {
            Ok(image) => Ok((hint, image)),
            Err(e) => {
                debug!(%hint, error = %e, "Filename hint did not decode");
                Err(PipelineError::unsupported(format!(
                    "content matches no known image signature and does not decode as {hint}"
                )))
            }
        }
    }

    fn decode(&self, data: &[u8], format: ImageFormat) -> PipelineResult<DynamicImage> {
        let codec = format
            .to_codec()
            .ok_or_else(|| PipelineError::unsupported(format!("no decoder for {format}")))?;

        let mut reader = ImageReader::with_format(Cursor::new(data), codec);
        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_DECODE_DIMENSION);
        limits.max_image_height = Some(MAX_DECODE_DIMENSION);
        reader.limits(limits);

        reader
            .decode()
            .map_err(|e| PipelineError::processing(format!("failed to decode {format}"), e))
    }

    fn encode_static(
        &self,
        image: &DynamicImage,
        source: ImageFormat,
    ) -> PipelineResult<NormalizedAsset> {
        let output = if self.config.preserve_jpeg && source == ImageFormat::Jpeg {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Png
        };

        let canvas = self.fit(image, output);

        let encoded = encode(&canvas, output, Compression::Standard)?;
        if encoded.len() <= self.config.max_bytes {
            info!(%output, size = encoded.len(), "Static sticker encoded");
            return Ok(NormalizedAsset::new(encoded, output));
        }

        debug!(
            size = encoded.len(),
            max = self.config.max_bytes,
            "Encoded sticker over ceiling, escalating compression once"
        );

        let escalated = encode(&canvas, output, Compression::Strong)?;
        let smallest = if escalated.len() < encoded.len() {
            escalated
        } else {
            encoded
        };

        if smallest.len() <= self.config.max_bytes {
            info!(%output, size = smallest.len(), "Static sticker encoded after escalation");
            return Ok(NormalizedAsset::new(smallest, output));
        }

        warn!(
            size = smallest.len(),
            max = self.config.max_bytes,
            "Sticker still over ceiling after escalation"
        );
        Err(PipelineError::too_large(
            smallest.len(),
            self.config.max_bytes,
        ))
    }

    /// Produces an image of exactly `canvas_size` x `canvas_size`.
    fn fit(&self, image: &DynamicImage, output: ImageFormat) -> DynamicImage {
        let size = self.config.canvas_size;

        let canvas = match self.config.fit {
            FitMode::Cover => image.resize_to_fill(size, size, FilterType::Lanczos3).to_rgba8(),
            FitMode::Contain => {
                let resized = image.resize(size, size, FilterType::Lanczos3).to_rgba8();
                let background = if output == ImageFormat::Jpeg {
                    WHITE
                } else {
                    TRANSPARENT
                };
                let mut canvas = RgbaImage::from_pixel(size, size, background);
                let x = i64::from(size.saturating_sub(resized.width()) / 2);
                let y = i64::from(size.saturating_sub(resized.height()) / 2);
                image::imageops::overlay(&mut canvas, &resized, x, y);
                canvas
            }
        };

        if output == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
        } else {
            DynamicImage::ImageRgba8(canvas)
        }
    }
}

fn encode(image: &DynamicImage, format: ImageFormat, level: Compression) -> PipelineResult<Vec<u8>> {
    let mut buf = Vec::new();

    let result = match format {
        ImageFormat::Jpeg => {
            let quality = match level {
                Compression::Standard => JPEG_QUALITY,
                Compression::Strong => JPEG_QUALITY_STRONG,
            };
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        }
        _ => match level {
            Compression::Standard => image.write_with_encoder(PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Default,
                PngFilter::Adaptive,
            )),
            Compression::Strong => {
                reduce_colour_depth(image).write_with_encoder(PngEncoder::new_with_quality(
                    &mut buf,
                    CompressionType::Best,
                    PngFilter::Adaptive,
                ))
            }
        },
    };

    result.map_err(|e| PipelineError::processing(format!("failed to encode {format}"), e))?;
    Ok(buf)
}

/// Drops the low bits of every colour channel. Alpha is kept exact.
fn reduce_colour_depth(image: &DynamicImage) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel &= STRONG_PNG_CHANNEL_MASK;
        }
    }
    DynamicImage::ImageRgba8(rgba)
}
