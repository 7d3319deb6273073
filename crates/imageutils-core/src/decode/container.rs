//! Decoding of encoded image containers into RGBA rasters.

use std::io::Cursor;

use image::{ImageError, ImageFormat, ImageReader};

use super::{DecodeError, RasterImage};

/// Decoder resource limits applied before any pixel buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum width and height in pixels.
    pub max_dimension: u32,
    /// Maximum bytes the decoder may allocate.
    pub max_alloc: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: 16_384,
            max_alloc: 512 * 1024 * 1024,
        }
    }
}

impl DecodeLimits {
    fn to_image_limits(self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

/// Decode an encoded image (JPEG, PNG, WebP, GIF, BMP) into RGBA pixels.
///
/// Orientation metadata is not applied here; see
/// [`resolve_rotation`](super::resolve_rotation).
///
/// # Errors
///
/// - `DecodeError::Empty` for a zero-length buffer
/// - `DecodeError::UnrecognizedFormat` when no supported container matches
/// - `DecodeError::Corrupted` for truncated or malformed data
/// - `DecodeError::LimitsExceeded` when the image is larger than `limits`
pub fn decode_image(bytes: &[u8], limits: &DecodeLimits) -> Result<RasterImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::UnrecognizedFormat)?;
    if format == ImageFormat::Jpeg && !jpeg_is_complete(bytes) {
        return Err(DecodeError::Corrupted(
            "JPEG stream ends before the end-of-image marker".to_string(),
        ));
    }

    reader.limits(limits.to_image_limits());

    let img = reader.decode().map_err(map_image_error)?;

    RasterImage::from_rgba_image(img.into_rgba8())
        .ok_or_else(|| DecodeError::Corrupted("image has zero width or height".to_string()))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::UnrecognizedFormat,
        ImageError::Limits(e) => DecodeError::LimitsExceeded(e.to_string()),
        other => DecodeError::Corrupted(other.to_string()),
    }
}

/// The JPEG decoder fills a truncated scan with grey instead of failing, so
/// require an end-of-image marker after the last start-of-scan marker.
/// Embedded EXIF thumbnails carry their own SOS/EOI pair, which always
/// precedes the primary image's scan.
fn jpeg_is_complete(bytes: &[u8]) -> bool {
    let last_marker = |marker: u8| bytes.windows(2).rposition(|w| w == [0xFF, marker]);
    match (last_marker(0xDA), last_marker(0xD9)) {
        (Some(sos), Some(eoi)) => eoi > sos,
        _ => false,
    }
}
