//! Re-encoding of rasters to JPEG, PNG or WebP.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::RasterImage;

/// Highest accepted quality value.
pub const MAX_QUALITY: i32 = 100;

/// Errors that can occur during encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Quality outside 0..=100
    #[error("Quality {0} is outside the range 0..=100")]
    QualityOutOfRange(i32),

    /// Format enumerant with no matching output format
    #[error("Unknown output format {0}")]
    UnknownFormat(i32),

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output container selector.
///
/// The integer values are the cross-boundary contract: callers pass them as
/// the `format` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum OutputFormat {
    Jpeg = 0,
    Png = 1,
    WebP = 2,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP];

    /// The integer enumerant used at the boundary.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

impl TryFrom<i32> for OutputFormat {
    type Error = EncodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OutputFormat::Jpeg),
            1 => Ok(OutputFormat::Png),
            2 => Ok(OutputFormat::WebP),
            other => Err(EncodeError::UnknownFormat(other)),
        }
    }
}

/// Check a boundary quality value without clamping it.
pub fn validate_quality(quality: i32) -> Result<u8, EncodeError> {
    if (0..=MAX_QUALITY).contains(&quality) {
        Ok(quality as u8)
    } else {
        Err(EncodeError::QualityOutOfRange(quality))
    }
}

/// Encoded bytes together with the format they were written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl EncodedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode a raster to `format`.
///
/// # Arguments
///
/// * `image` - The raster to encode
/// * `quality` - 0-100; only JPEG uses it, PNG and WebP are lossless
/// * `format` - Output container
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
///
/// JPEG has no alpha channel: transparent pixels are written with their
/// colour channels only, so the default transparent background becomes black.
pub fn encode_image(
    image: &RasterImage,
    quality: i32,
    format: OutputFormat,
) -> Result<EncodedImage, EncodeError> {
    let quality = validate_quality(quality)?;
    let (width, height) = image.dimensions();
    let mut buffer = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.as_rgba_image().clone()).into_rgb8();
            // The encoder's lowest setting is 1
            JpegEncoder::new_with_quality(&mut buffer, quality.max(1))
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| EncodeError::EncodingFailed(format!("JPEG: {e}")))?;
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer)
                .write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| EncodeError::EncodingFailed(format!("PNG: {e}")))?;
        }
        OutputFormat::WebP => {
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| EncodeError::EncodingFailed(format!("WebP: {e}")))?;
        }
    }

    Ok(EncodedImage {
        bytes: buffer.into_inner(),
        format,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
