//! ImageUtils Core - EXIF-aware image transform engine
//!
//! Each operation takes an encoded image (JPEG, PNG, WebP, GIF or BMP),
//! corrects it to its EXIF display orientation, applies one geometric
//! transform (crop, rotate, resize or resize-to-max) and re-encodes it as
//! JPEG, PNG or WebP.
//!
//! ```ignore
//! use imageutils_core::{execute, TransformRequest};
//!
//! let request = TransformRequest::crop(10, 10, 100, 100, 90, 0);
//! let jpeg = execute(&request, &input_bytes)?.into_bytes();
//! ```

pub mod config;
pub mod decode;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod transform;

pub use config::EngineConfig;
pub use decode::{DecodeError, FilterType, Orientation, OrientationDegrees, RasterImage};
pub use dispatch::{execute, Engine, Operation, OperationResult, TransformRequest};
pub use encode::{EncodeError, EncodedImage, OutputFormat};
pub use error::{ErrorKind, OperationError};
pub use transform::{GeometryError, InterpolationFilter, OutputLimits};
