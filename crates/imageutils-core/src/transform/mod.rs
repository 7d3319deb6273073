//! Geometry engine: crop, rotate and resize over RGBA rasters.
//!
//! Every operation borrows its input and returns a new [`RasterImage`];
//! nothing is modified in place.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Crop rectangles are in pixels of the (orientation-corrected) image
//! - Rotation angles are in degrees, positive = clockwise
//!
//! [`RasterImage`]: crate::decode::RasterImage

mod crop;
mod resize;
mod rotation;

use thiserror::Error;

use crate::decode::BYTES_PER_PIXEL;

pub use crop::crop;
pub use resize::{fit_dimensions, resize, resize_to_max};
pub use rotation::{rotate, rotated_bounds, InterpolationFilter, RotateOptions};

/// Invalid parameters for a geometry operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// A requested width or height is zero or negative.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be positive")]
    InvalidDimensions { width: i32, height: i32 },

    /// The crop rectangle is not fully inside the image.
    #[error(
        "Crop rectangle {width}x{height} at ({x}, {y}) exceeds image bounds {image_width}x{image_height}"
    )]
    CropOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        image_width: u32,
        image_height: u32,
    },

    /// The max-size cap is zero or negative.
    #[error("Invalid max size {0}: must be positive")]
    InvalidMaxSize(i32),

    /// The rotation angle is NaN or infinite.
    #[error("Invalid rotation angle {0}")]
    InvalidAngle(f64),

    /// The output would have more pixels than can be addressed.
    #[error("Output of {width}x{height} is too large")]
    OutputTooLarge { width: u64, height: u64 },
}

/// Upper bounds on the raster a geometry operation may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLimits {
    /// Maximum output width and height in pixels.
    pub max_dimension: u32,
    /// Maximum output buffer size in bytes.
    pub max_alloc: u64,
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            max_dimension: 16_384,
            max_alloc: 512 * 1024 * 1024,
        }
    }
}

impl OutputLimits {
    /// Accept a `width` x `height` output, or fail with `OutputTooLarge`.
    pub fn check(&self, width: u64, height: u64) -> Result<(u32, u32), GeometryError> {
        let too_large = || GeometryError::OutputTooLarge { width, height };

        let max_dimension = u64::from(self.max_dimension);
        if width > max_dimension || height > max_dimension {
            return Err(too_large());
        }
        let bytes = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL as u64))
            .ok_or_else(too_large)?;
        if bytes > self.max_alloc {
            return Err(too_large());
        }

        // Both fit in u32 after the dimension check
        Ok((width as u32, height as u32))
    }
}
