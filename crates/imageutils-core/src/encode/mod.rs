//! Encoding side of the codec adapter.
//!
//! This module provides functionality for:
//! - Encoding rasters to JPEG (quality-controlled), PNG or WebP (lossless)
//! - Mapping the integer `format` enumerant to an [`OutputFormat`]
//!
//! # Examples
//!
//! ```ignore
//! use imageutils_core::encode::{encode_image, OutputFormat};
//!
//! let encoded = encode_image(&raster, 90, OutputFormat::Jpeg)?;
//! println!("Encoded {} bytes", encoded.len());
//! ```

mod format;

pub use format::{
    encode_image, validate_quality, EncodeError, EncodedImage, OutputFormat, MAX_QUALITY,
};
