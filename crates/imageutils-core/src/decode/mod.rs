//! Decoding side of the codec adapter.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP, GIF and BMP buffers into RGBA rasters
//! - Resolving EXIF orientation into a clockwise correction angle
//!
//! Orientation is resolved separately from pixel decoding: the decoder
//! returns the pixels as stored, and the dispatcher rotates them using the
//! angle from [`resolve_rotation`].

mod container;
mod orientation;
mod types;

pub use container::{decode_image, DecodeLimits};
pub use orientation::{read_orientation, resolve_rotation};
pub use types::{
    DecodeError, FilterType, Orientation, OrientationDegrees, RasterImage, BYTES_PER_PIXEL,
};

#[cfg(test)]
pub(crate) use orientation::fixtures;
