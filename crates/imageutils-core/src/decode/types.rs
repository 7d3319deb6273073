//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per pixel of every [`RasterImage`] (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Error types for image decoding operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input buffer has no bytes at all.
    #[error("Input buffer is empty")]
    Empty,

    /// The bytes are not a recognized image container.
    #[error("Invalid or unsupported image format")]
    UnrecognizedFormat,

    /// The image data is corrupted or truncated.
    #[error("Corrupted or incomplete image data: {0}")]
    Corrupted(String),

    /// The declared dimensions exceed the decoder limits.
    #[error("Image exceeds decoder limits: {0}")]
    LimitsExceeded(String),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (rotate 90 CW + flip horizontal).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (rotate 270 CW + flip horizontal).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// The clockwise rotation that displays the stored pixels upright.
    ///
    /// Mirrored orientations collapse to their nearest rotation; the
    /// mirror component is dropped.
    pub fn rotation(self) -> OrientationDegrees {
        match self {
            Orientation::Normal | Orientation::FlipHorizontal => OrientationDegrees::D0,
            Orientation::Rotate180 | Orientation::FlipVertical => OrientationDegrees::D180,
            Orientation::Transpose | Orientation::Rotate90CW => OrientationDegrees::D90,
            Orientation::Transverse | Orientation::Rotate270CW => OrientationDegrees::D270,
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Normalized orientation correction, in clockwise degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrientationDegrees {
    #[default]
    D0,
    D90,
    D180,
    D270,
}

impl OrientationDegrees {
    pub fn degrees(self) -> i32 {
        match self {
            OrientationDegrees::D0 => 0,
            OrientationDegrees::D90 => 90,
            OrientationDegrees::D180 => 180,
            OrientationDegrees::D270 => 270,
        }
    }
}

/// A decoded image with RGBA pixel data.
///
/// Width and height are always non-zero and the buffer always holds
/// exactly `width * height * 4` bytes; the constructors enforce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    buffer: image::RgbaImage,
}

impl RasterImage {
    /// Create a RasterImage, or `None` if the dimensions are zero or the
    /// buffer length does not match them.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        if pixels.len() != expected {
            return None;
        }
        image::RgbaImage::from_raw(width, height, pixels).map(|buffer| Self { buffer })
    }

    /// Create a RasterImage filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        Some(Self { buffer })
    }

    /// Create a RasterImage from an image::RgbaImage.
    ///
    /// Returns `None` for zero-sized buffers.
    pub fn from_rgba_image(buffer: image::RgbaImage) -> Option<Self> {
        if buffer.width() == 0 || buffer.height() == 0 {
            return None;
        }
        Some(Self { buffer })
    }

    /// Borrow the underlying image::RgbaImage.
    pub fn as_rgba_image(&self) -> &image::RgbaImage {
        &self.buffer
    }

    /// Consume into an image::RgbaImage without copying.
    pub fn into_rgba_image(self) -> image::RgbaImage {
        self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// RGBA pixel data in row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.buffer.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.buffer.as_raw().len()
    }
}
