//! Operation dispatcher.
//!
//! A [`TransformRequest`] names one of the four operations plus the output
//! quality and format. [`Engine::execute`] runs the whole pipeline for it:
//!
//! 1. validate quality and format
//! 2. decode the input bytes
//! 3. resolve the EXIF orientation
//! 4. rotate by the orientation (summed with the requested angle for `Rotate`)
//! 5. apply the requested crop or resize
//! 6. encode
//!
//! The first failing step ends the operation; nothing partial is returned.

use tracing::{debug, debug_span, warn};

use crate::config::EngineConfig;
use crate::decode::{decode_image, resolve_rotation, RasterImage};
use crate::encode::{encode_image, validate_quality, EncodedImage, OutputFormat};
use crate::error::OperationError;
use crate::transform;

/// Outcome of one dispatched operation.
pub type OperationResult = Result<EncodedImage, OperationError>;

/// The transform to apply after orientation correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Crop {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Rotate {
        angle: i32,
    },
    Resize {
        dest_width: i32,
        dest_height: i32,
    },
    ResizeToMax {
        max_size: i32,
    },
}

impl Operation {
    /// Method name used at the boundary.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Crop { .. } => "crop",
            Operation::Rotate { .. } => "rotate",
            Operation::Resize { .. } => "resize",
            Operation::ResizeToMax { .. } => "resizeToMax",
        }
    }
}

/// One operation request: the transform plus output quality and format.
///
/// `quality` and `format` are kept as received; [`Engine::execute`]
/// validates them before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRequest {
    pub operation: Operation,
    pub quality: i32,
    pub format: i32,
}

impl TransformRequest {
    pub fn new(operation: Operation, quality: i32, format: i32) -> Self {
        Self {
            operation,
            quality,
            format,
        }
    }

    pub fn crop(x: i32, y: i32, width: i32, height: i32, quality: i32, format: i32) -> Self {
        Self::new(
            Operation::Crop {
                x,
                y,
                width,
                height,
            },
            quality,
            format,
        )
    }

    pub fn rotate(angle: i32, quality: i32, format: i32) -> Self {
        Self::new(Operation::Rotate { angle }, quality, format)
    }

    pub fn resize(dest_width: i32, dest_height: i32, quality: i32, format: i32) -> Self {
        Self::new(
            Operation::Resize {
                dest_width,
                dest_height,
            },
            quality,
            format,
        )
    }

    pub fn resize_to_max(max_size: i32, quality: i32, format: i32) -> Self {
        Self::new(Operation::ResizeToMax { max_size }, quality, format)
    }
}

/// Stateless transform engine. Holds only immutable configuration, so one
/// engine can serve any number of threads at once.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `request` against the encoded image in `bytes`.
    pub fn execute(&self, request: &TransformRequest, bytes: &[u8]) -> OperationResult {
        let span = debug_span!(
            "execute",
            op = request.operation.name(),
            input_len = bytes.len()
        );
        let _enter = span.enter();

        let result = self.run(request, bytes);
        match &result {
            Ok(encoded) => debug!(
                output_len = encoded.len(),
                format = ?encoded.format(),
                "operation complete"
            ),
            Err(err) => warn!(kind = err.kind().as_str(), error = %err, "operation failed"),
        }
        result
    }

    fn run(&self, request: &TransformRequest, bytes: &[u8]) -> OperationResult {
        let format = OutputFormat::try_from(request.format)?;
        validate_quality(request.quality)?;

        let decoded = decode_image(bytes, &self.config.decode_limits())?;
        let orientation = resolve_rotation(bytes);
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            orientation = orientation.degrees(),
            "decoded"
        );

        let transformed = self.apply(&request.operation, decoded, orientation.degrees())?;
        debug!(
            width = transformed.width(),
            height = transformed.height(),
            "transformed"
        );

        Ok(encode_image(&transformed, request.quality, format)?)
    }

    fn apply(
        &self,
        operation: &Operation,
        image: RasterImage,
        orientation_degrees: i32,
    ) -> Result<RasterImage, OperationError> {
        let rotate_options = self.config.rotate_options();

        if let Operation::Rotate { angle } = *operation {
            let total = angle as f64 + orientation_degrees as f64;
            return Ok(transform::rotate(&image, total, &rotate_options)?);
        }

        let oriented = if orientation_degrees == 0 {
            image
        } else {
            transform::rotate(&image, orientation_degrees as f64, &rotate_options)?
        };

        let filter = self.config.resize_filter;
        let limits = self.config.output_limits();
        let result = match *operation {
            Operation::Crop {
                x,
                y,
                width,
                height,
            } => transform::crop(&oriented, x, y, width, height)?,
            Operation::Resize {
                dest_width,
                dest_height,
            } => transform::resize(&oriented, dest_width, dest_height, filter, &limits)?,
            Operation::ResizeToMax { max_size } => transform::resize_to_max(
                &oriented,
                max_size,
                filter,
                self.config.upscale_to_max,
                &limits,
            )?,
            Operation::Rotate { .. } => oriented,
        };
        Ok(result)
    }
}

/// Run `request` with the default engine configuration.
pub fn execute(request: &TransformRequest, bytes: &[u8]) -> OperationResult {
    Engine::default().execute(request, bytes)
}
