//! Engine configuration.
//!
//! Configuration is fixed when an [`Engine`](crate::Engine) is built and is
//! the only state an engine holds. It deserializes from camelCase keys, with
//! every field optional:
//!
//! ```json
//! { "resizeFilter": "Bilinear", "upscaleToMax": false, "maxOutputDimension": 4096 }
//! ```

use serde::{Deserialize, Serialize};

use crate::decode::{DecodeLimits, FilterType};
use crate::transform::{InterpolationFilter, OutputLimits, RotateOptions};

/// Immutable settings shared by every operation an engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Filter for `resize` and `resizeToMax`.
    pub resize_filter: FilterType,
    /// Interpolation for rotations that are not a multiple of 90°.
    pub rotation_filter: InterpolationFilter,
    /// RGBA fill for pixels a rotation leaves uncovered.
    pub background: [u8; 4],
    /// Whether `resizeToMax` enlarges images that already fit.
    pub upscale_to_max: bool,
    /// Largest accepted input width or height.
    pub max_input_dimension: u32,
    /// Largest allocation the decoder may make, in bytes.
    pub max_input_alloc: u64,
    /// Largest width or height a transform may produce.
    pub max_output_dimension: u32,
    /// Largest output pixel buffer a transform may allocate, in bytes.
    pub max_output_alloc: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let limits = DecodeLimits::default();
        let output = OutputLimits::default();
        Self {
            resize_filter: FilterType::Lanczos3,
            rotation_filter: InterpolationFilter::Bilinear,
            background: [0, 0, 0, 0],
            upscale_to_max: true,
            max_input_dimension: limits.max_dimension,
            max_input_alloc: limits.max_alloc,
            max_output_dimension: output.max_dimension,
            max_output_alloc: output.max_alloc,
        }
    }
}

impl EngineConfig {
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_dimension: self.max_input_dimension,
            max_alloc: self.max_input_alloc,
        }
    }

    pub fn output_limits(&self) -> OutputLimits {
        OutputLimits {
            max_dimension: self.max_output_dimension,
            max_alloc: self.max_output_alloc,
        }
    }

    pub fn rotate_options(&self) -> RotateOptions {
        RotateOptions {
            filter: self.rotation_filter,
            background: self.background,
            limits: self.output_limits(),
        }
    }
}
