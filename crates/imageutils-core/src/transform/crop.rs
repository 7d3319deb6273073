//! Pixel-rectangle cropping.
//!
//! Unlike a clamping crop, the rectangle must lie fully inside the image:
//! a rectangle that reaches past an edge is rejected rather than shrunk, so
//! a successful crop always has exactly the requested size.

use super::GeometryError;
use crate::decode::{RasterImage, BYTES_PER_PIXEL};

/// Crop `[x, x + width) × [y, y + height)` out of `image`.
///
/// # Errors
///
/// - `GeometryError::InvalidDimensions` if `width` or `height` is not positive
/// - `GeometryError::CropOutOfBounds` if the rectangle is not contained in
///   `[0, image.width) × [0, image.height)`
pub fn crop(
    image: &RasterImage,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
) -> Result<RasterImage, GeometryError> {
    if width <= 0 || height <= 0 {
        return Err(GeometryError::InvalidDimensions { width, height });
    }

    let (img_w, img_h) = image.dimensions();
    let out_of_bounds = x < 0
        || y < 0
        || x as i64 + width as i64 > img_w as i64
        || y as i64 + height as i64 > img_h as i64;
    if out_of_bounds {
        return Err(GeometryError::CropOutOfBounds {
            x,
            y,
            width,
            height,
            image_width: img_w,
            image_height: img_h,
        });
    }

    let (left, top) = (x as usize, y as usize);
    let (out_w, out_h) = (width as usize, height as usize);
    let src_stride = img_w as usize * BYTES_PER_PIXEL;
    let row_len = out_w * BYTES_PER_PIXEL;
    let src = image.pixels();

    // Copy pixel data row by row
    let mut output = Vec::with_capacity(row_len * out_h);
    for row in top..top + out_h {
        let start = row * src_stride + left * BYTES_PER_PIXEL;
        output.extend_from_slice(&src[start..start + row_len]);
    }

    RasterImage::new(width as u32, height as u32, output).ok_or(GeometryError::OutputTooLarge {
        width: width as u64,
        height: height as u64,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
