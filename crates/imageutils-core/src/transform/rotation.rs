//! Image rotation by arbitrary angles.
//!
//! Multiples of 90° are exact pixel permutations. Any other angle uses
//! inverse mapping: for each output pixel centre we find the source position
//! and interpolate. With `θ` clockwise and y pointing down:
//!
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//!
//! where `(dx, dy)` is the output pixel centre relative to the output centre.

use serde::{Deserialize, Serialize};

use super::{GeometryError, OutputLimits};
use crate::decode::{RasterImage, BYTES_PER_PIXEL};

/// Angles closer than this to a multiple of 90° take the exact path.
const RIGHT_ANGLE_EPSILON: f64 = 1e-6;

/// Interpolation filter for arbitrary-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation over a 6x6 neighbourhood.
    Lanczos3,
}

/// Settings for [`rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotateOptions {
    pub filter: InterpolationFilter,
    /// RGBA value for output pixels not covered by the source.
    pub background: [u8; 4],
    /// Bounds on the expanded canvas of an arbitrary-angle rotation.
    pub limits: OutputLimits,
}

impl Default for RotateOptions {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::Bilinear,
            background: [0, 0, 0, 0],
            limits: OutputLimits::default(),
        }
    }
}

/// Number of clockwise quarter turns if `angle` is a right-angle multiple.
fn quarter_turns(angle_degrees: f64) -> Option<u32> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let quarters = (normalized / 90.0).round();
    if (normalized - quarters * 90.0).abs() < RIGHT_ANGLE_EPSILON {
        Some(quarters as u32 % 4)
    } else {
        None
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// The box is rounded up so that no corner of the rotated content falls
/// outside it.
///
/// # Example
///
/// ```
/// use imageutils_core::transform::rotated_bounds;
///
/// assert_eq!(rotated_bounds(100, 50, 90.0), (50, 100));
/// assert_eq!(rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let (w, h) = bounds_f64(width, height, angle_degrees);
    ((w as u32).max(1), (h as u32).max(1))
}

fn bounds_f64(width: u32, height: u32, angle_degrees: f64) -> (f64, f64) {
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();
    let (w, h) = (width as f64, height as f64);

    // Shave float noise so 100.0000000001 does not grow to 101
    let new_w = (w * cos + h * sin - RIGHT_ANGLE_EPSILON).ceil();
    let new_h = (w * sin + h * cos - RIGHT_ANGLE_EPSILON).ceil();
    (new_w, new_h)
}

/// Rotate an image clockwise about its centre.
///
/// The output canvas exactly bounds the rotated content; uncovered pixels
/// are filled with `options.background`.
///
/// # Errors
///
/// - `GeometryError::InvalidAngle` for NaN or infinite angles
/// - `GeometryError::OutputTooLarge` if the bounding box exceeds `options.limits`
pub fn rotate(
    image: &RasterImage,
    angle_degrees: f64,
    options: &RotateOptions,
) -> Result<RasterImage, GeometryError> {
    if !angle_degrees.is_finite() {
        return Err(GeometryError::InvalidAngle(angle_degrees));
    }

    if let Some(turns) = quarter_turns(angle_degrees) {
        return Ok(rotate_quarters(image, turns));
    }

    let (bw, bh) = bounds_f64(image.width(), image.height(), angle_degrees);
    let (dst_w, dst_h) = options.limits.check((bw as u64).max(1), (bh as u64).max(1))?;
    let too_large = GeometryError::OutputTooLarge {
        width: u64::from(dst_w),
        height: u64::from(dst_h),
    };
    let len = (dst_w as usize)
        .checked_mul(dst_h as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| too_large.clone())?;

    let angle_rad = angle_degrees.to_radians();
    let (sin, cos) = angle_rad.sin_cos();

    let src_cx = image.width() as f64 / 2.0;
    let src_cy = image.height() as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; len];

    for (dst_y, row) in output
        .chunks_exact_mut(dst_w as usize * BYTES_PER_PIXEL)
        .enumerate()
    {
        let dy = dst_y as f64 + 0.5 - dst_cy;
        for (dst_x, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let dx = dst_x as f64 + 0.5 - dst_cx;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            let pixel = match options.filter {
                InterpolationFilter::Bilinear => {
                    sample_bilinear(image, src_x, src_y, options.background)
                }
                InterpolationFilter::Lanczos3 => {
                    sample_lanczos3(image, src_x, src_y, options.background)
                }
            };
            px.copy_from_slice(&pixel);
        }
    }

    RasterImage::new(dst_w, dst_h, output).ok_or(too_large)
}

fn rotate_quarters(image: &RasterImage, turns: u32) -> RasterImage {
    let buffer = image.as_rgba_image();
    let rotated = match turns {
        1 => image::imageops::rotate90(buffer),
        2 => image::imageops::rotate180(buffer),
        3 => image::imageops::rotate270(buffer),
        _ => return image.clone(),
    };
    // Quarter turns keep both dimensions non-zero
    RasterImage::from_rgba_image(rotated).unwrap_or_else(|| image.clone())
}

/// Get a pixel as [f64; 4], clamping coordinates to the image.
#[inline]
fn get_pixel_f64(image: &RasterImage, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, image.width() as i64 - 1) as usize;
    let y = py.clamp(0, image.height() as i64 - 1) as usize;
    let idx = (y * image.width() as usize + x) * BYTES_PER_PIXEL;
    let p = &image.pixels()[idx..idx + BYTES_PER_PIXEL];
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

/// Whether a continuous source position (pixel edges at integers) lies on
/// the source image.
#[inline]
fn covers(image: &RasterImage, x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x <= image.width() as f64 && y <= image.height() as f64
}

/// Sample a pixel using bilinear interpolation.
///
/// `x`/`y` are continuous coordinates where pixel `(i, j)` covers
/// `[i, i+1) × [j, j+1)`; positions off the image return `background`.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64, background: [u8; 4]) -> [u8; 4] {
    if !covers(image, x, y) {
        return background;
    }

    // Shift to pixel-centre coordinates
    let u = x - 0.5;
    let v = y - 0.5;
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;
    let fx = u - x0 as f64;
    let fy = v - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..BYTES_PER_PIXEL {
        let value = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = value.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Falls back to bilinear within three pixels of an edge, where the kernel
/// would reach past the image.
fn sample_lanczos3(image: &RasterImage, x: f64, y: f64, background: [u8; 4]) -> [u8; 4] {
    let (w, h) = (image.width() as f64, image.height() as f64);
    if x < 3.0 || x > w - 3.0 || y < 3.0 || y > h - 3.0 {
        return sample_bilinear(image, x, y, background);
    }

    let u = x - 0.5;
    let v = y - 0.5;
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(u - px as f64, 3.0) * lanczos_weight(v - py as f64, 3.0);

            let pixel = get_pixel_f64(image, px, py);
            for i in 0..BYTES_PER_PIXEL {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum.abs() > f64::EPSILON {
        for i in 0..BYTES_PER_PIXEL {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a simple test image with a gradient pattern.
    fn test_image(width: u32, height: u32) -> RasterImage {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 8 % 256) as u8;
            image::Rgba([v, v, v, 255])
        });
        RasterImage::from_rgba_image(img).unwrap()
    }

    /// 2x1 image: red on the left, green on the right.
    fn red_green() -> RasterImage {
        RasterImage::new(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap()
    }

    fn rotate_default(image: &RasterImage, angle: f64) -> RasterImage {
        rotate(image, angle, &RotateOptions::default()).unwrap()
    }

    #[test]
    fn test_no_rotation() {
        let img = test_image(100, 50);
        assert_eq!(rotate_default(&img, 0.0), img);
    }

    #[test]
    fn test_full_rotation_is_identity() {
        let img = test_image(30, 20);
        assert_eq!(rotate_default(&img, 360.0), img);
        assert_eq!(rotate_default(&img, -720.0), img);
    }

    #[test]
    fn test_rotate_90_is_clockwise() {
        // Red (left) must end up on top after a clockwise quarter turn
        let result = rotate_default(&red_green(), 90.0);
        assert_eq!(result.dimensions(), (1, 2));
        assert_eq!(result.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(result.pixel(0, 1), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_rotate_270_and_negative_90_agree() {
        let img = test_image(7, 3);
        let a = rotate_default(&img, 270.0);
        let b = rotate_default(&img, -90.0);
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), (3, 7));
        // Red (left) ends up at the bottom
        let result = rotate_default(&red_green(), -90.0);
        assert_eq!(result.pixel(0, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_rotate_180_reverses() {
        let result = rotate_default(&red_green(), 180.0);
        assert_eq!(result.dimensions(), (2, 1));
        assert_eq!(result.pixel(0, 0), Some([0, 255, 0, 255]));
        assert_eq!(result.pixel(1, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_90_degree_rotation_bounds() {
        assert_eq!(rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(rotated_bounds(100, 50, -90.0), (50, 100));
    }

    #[test]
    fn test_180_degree_rotation_bounds() {
        assert_eq!(rotated_bounds(100, 50, 180.0), (100, 50));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        // Diagonal of 100x100 square is ~141.4, rounded up
        assert_eq!(rotated_bounds(100, 100, 45.0), (142, 142));
    }

    #[test]
    fn test_large_rotation_angles() {
        assert_eq!(rotated_bounds(100, 50, 720.0), (100, 50));
        assert_eq!(rotated_bounds(100, 50, 450.0), (50, 100));
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(rotated_bounds(100, 80, 30.0), rotated_bounds(100, 80, -30.0));
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, 270.0, 359.0] {
            let (w, h) = rotated_bounds(1, 1, angle);
            assert!(w > 0 && h > 0, "zero bounds for angle {}", angle);
        }
    }

    #[test]
    fn test_rotation_expands_canvas() {
        let img = test_image(100, 100);
        let result = rotate_default(&img, 45.0);
        assert_eq!(result.dimensions(), (142, 142));
    }

    #[test]
    fn test_rotation_fills_corners_with_background() {
        let img = RasterImage::filled(40, 40, [200, 100, 50, 255]).unwrap();
        let result = rotate_default(&img, 45.0);

        // Corners are outside the rotated square
        assert_eq!(result.pixel(0, 0), Some([0, 0, 0, 0]));
        let (w, h) = result.dimensions();
        assert_eq!(result.pixel(w - 1, h - 1), Some([0, 0, 0, 0]));
        // Centre is covered
        assert_eq!(result.pixel(w / 2, h / 2), Some([200, 100, 50, 255]));
    }

    #[test]
    fn test_custom_background() {
        let img = RasterImage::filled(20, 20, [0, 0, 0, 255]).unwrap();
        let options = RotateOptions {
            background: [255, 255, 255, 255],
            ..RotateOptions::default()
        };
        let result = rotate(&img, 30.0, &options).unwrap();
        assert_eq!(result.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_bilinear_vs_lanczos_same_dimensions() {
        let img = test_image(50, 50);
        let bilinear = rotate_default(&img, 15.0);
        let lanczos = rotate(
            &img,
            15.0,
            &RotateOptions {
                filter: InterpolationFilter::Lanczos3,
                ..RotateOptions::default()
            },
        )
        .unwrap();
        assert_eq!(bilinear.dimensions(), lanczos.dimensions());
    }

    #[test]
    fn test_lanczos_uniform_image_stays_uniform() {
        let img = RasterImage::filled(30, 30, [120, 120, 120, 255]).unwrap();
        let options = RotateOptions {
            filter: InterpolationFilter::Lanczos3,
            ..RotateOptions::default()
        };
        let result = rotate(&img, 10.0, &options).unwrap();
        let (w, h) = result.dimensions();
        assert_eq!(result.pixel(w / 2, h / 2), Some([120, 120, 120, 255]));
    }

    #[test]
    fn test_rotation_canvas_respects_limits() {
        let img = RasterImage::filled(20, 20, [1, 2, 3, 255]).unwrap();
        let options = RotateOptions {
            limits: OutputLimits {
                max_dimension: 20,
                max_alloc: u64::MAX,
            },
            ..RotateOptions::default()
        };

        // 20 * sqrt(2) rounds up to 29
        assert_eq!(
            rotate(&img, 45.0, &options),
            Err(GeometryError::OutputTooLarge {
                width: 29,
                height: 29
            })
        );
        // Quarter turns never grow the canvas
        assert_eq!(rotate(&img, 90.0, &options).unwrap().dimensions(), (20, 20));
    }

    #[test]
    fn test_rotation_canvas_respects_alloc_limit() {
        let img = RasterImage::filled(10, 10, [1, 2, 3, 255]).unwrap();
        let options = RotateOptions {
            limits: OutputLimits {
                max_dimension: 1000,
                max_alloc: 10 * 10 * 4,
            },
            ..RotateOptions::default()
        };
        assert!(matches!(
            rotate(&img, 30.0, &options),
            Err(GeometryError::OutputTooLarge { .. })
        ));
    }

    #[test]
    fn test_rotation_rejects_non_finite_angle() {
        let img = test_image(4, 4);
        let options = RotateOptions::default();
        assert!(matches!(
            rotate(&img, f64::NAN, &options),
            Err(GeometryError::InvalidAngle(_))
        ));
        assert!(matches!(
            rotate(&img, f64::INFINITY, &options),
            Err(GeometryError::InvalidAngle(_))
        ));
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = RasterImage::filled(1, 1, [128, 128, 128, 255]).unwrap();
        let result = rotate_default(&img, 45.0);
        assert!(result.width() >= 1);
        assert!(result.height() >= 1);
    }

    #[test]
    fn test_very_thin_image_rotation() {
        let img = test_image(100, 1);
        let result = rotate_default(&img, 45.0);
        assert!(result.width() > 1);
        assert!(result.height() > 1);
    }

    #[test]
    fn test_rotation_does_not_modify_input() {
        let img = test_image(20, 10);
        let before = img.clone();
        let _ = rotate_default(&img, 33.0);
        assert_eq!(img, before);
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-10);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
