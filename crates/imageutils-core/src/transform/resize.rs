//! Exact and bounding-box resizing.
//!
//! Both functions return new rasters without modifying the input.

use super::{GeometryError, OutputLimits};
use crate::decode::{FilterType, RasterImage};

/// Resize an image to exact dimensions, ignoring its aspect ratio.
///
/// # Errors
///
/// Returns `GeometryError::InvalidDimensions` if either dimension is not
/// positive, `GeometryError::OutputTooLarge` if the output exceeds `limits`.
pub fn resize(
    image: &RasterImage,
    width: i32,
    height: i32,
    filter: FilterType,
    limits: &OutputLimits,
) -> Result<RasterImage, GeometryError> {
    if width <= 0 || height <= 0 {
        return Err(GeometryError::InvalidDimensions { width, height });
    }
    let (width, height) = limits.check(width as u64, height as u64)?;
    Ok(resize_unchecked(image, width, height, filter))
}

fn resize_unchecked(image: &RasterImage, width: u32, height: u32, filter: FilterType) -> RasterImage {
    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let resized = image::imageops::resize(
        image.as_rgba_image(),
        width,
        height,
        filter.to_image_filter(),
    );
    // Both target dimensions are positive
    RasterImage::from_rgba_image(resized).unwrap_or_else(|| image.clone())
}

/// Scale an image so its longer side equals `max_size`, preserving the
/// aspect ratio.
///
/// When the longer side is already at most `max_size`, `upscale` decides:
/// `true` enlarges to `max_size`, `false` returns an unchanged copy.
///
/// # Errors
///
/// Returns `GeometryError::InvalidMaxSize` if `max_size` is not positive,
/// `GeometryError::OutputTooLarge` if the scaled output exceeds `limits`.
pub fn resize_to_max(
    image: &RasterImage,
    max_size: i32,
    filter: FilterType,
    upscale: bool,
    limits: &OutputLimits,
) -> Result<RasterImage, GeometryError> {
    if max_size <= 0 {
        return Err(GeometryError::InvalidMaxSize(max_size));
    }
    let max_size = max_size as u32;

    let (src_width, src_height) = image.dimensions();
    if !upscale && src_width.max(src_height) <= max_size {
        return Ok(image.clone());
    }

    let (new_width, new_height) = fit_dimensions(src_width, src_height, max_size);
    let (new_width, new_height) = limits.check(new_width as u64, new_height as u64)?;
    Ok(resize_unchecked(image, new_width, new_height, filter))
}

/// Dimensions with the longer side set to `max_size` and the shorter side
/// scaled proportionally (never below 1).
pub fn fit_dimensions(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        // Landscape or square: constrain by width
        let new_height = (max_size as f64 / ratio).round() as u32;
        (max_size, new_height.max(1))
    } else {
        // Portrait: constrain by height
        let new_width = (max_size as f64 * ratio).round() as u32;
        (new_width.max(1), max_size)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
