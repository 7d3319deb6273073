//! Named-argument method calls.
//!
//! A call arrives as a method name plus a bag of named arguments. This module
//! turns the pair into a core [`TransformRequest`] or a [`BoundaryError`].

use std::str::FromStr;

use imageutils_core::{OperationError, TransformRequest};
use serde::Deserialize;
use thiserror::Error;

/// Failures seen at the boundary. All of them collapse to an absent reply.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundaryError {
    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl BoundaryError {
    /// Diagnostic kind used in failure logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BoundaryError::UnknownMethod(_) => "unknown_method",
            BoundaryError::InvalidArguments(_) => "invalid_arguments",
            BoundaryError::Operation(err) => err.kind().as_str(),
        }
    }
}

/// The four method names accepted by the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Crop,
    Rotate,
    Resize,
    ResizeToMax,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Crop => "crop",
            Method::Rotate => "rotate",
            Method::Resize => "resize",
            Method::ResizeToMax => "resizeToMax",
        }
    }
}

impl FromStr for Method {
    type Err = BoundaryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "crop" => Ok(Method::Crop),
            "rotate" => Ok(Method::Rotate),
            "resize" => Ok(Method::Resize),
            "resizeToMax" => Ok(Method::ResizeToMax),
            other => Err(BoundaryError::UnknownMethod(other.to_string())),
        }
    }
}

/// Named arguments as received from the caller (camelCase keys).
///
/// Every field is optional here; which ones are required depends on the
/// method and is checked by [`MethodCall::into_request`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Arguments {
    pub bytes: Option<Vec<u8>>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub angle: Option<i32>,
    pub dest_width: Option<i32>,
    pub dest_height: Option<i32>,
    pub max_size: Option<i32>,
    pub quality: Option<i32>,
    pub format: Option<i32>,
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, BoundaryError> {
    value.ok_or_else(|| BoundaryError::InvalidArguments(format!("missing argument `{}`", name)))
}

/// One method invocation: name plus named arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Arguments,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Resolve the call into a request and the input bytes.
    ///
    /// # Errors
    ///
    /// `UnknownMethod` for an unrecognized name, `InvalidArguments` when an
    /// argument the method needs is missing.
    pub fn into_request(self) -> Result<(TransformRequest, Vec<u8>), BoundaryError> {
        let method: Method = self.method.parse()?;
        let args = self.arguments;

        let bytes = required(args.bytes, "bytes")?;
        let quality = required(args.quality, "quality")?;
        let format = required(args.format, "format")?;

        let request = match method {
            Method::Crop => TransformRequest::crop(
                required(args.x, "x")?,
                required(args.y, "y")?,
                required(args.width, "width")?,
                required(args.height, "height")?,
                quality,
                format,
            ),
            Method::Rotate => TransformRequest::rotate(required(args.angle, "angle")?, quality, format),
            Method::Resize => TransformRequest::resize(
                required(args.dest_width, "destWidth")?,
                required(args.dest_height, "destHeight")?,
                quality,
                format,
            ),
            Method::ResizeToMax => {
                TransformRequest::resize_to_max(required(args.max_size, "maxSize")?, quality, format)
            }
        };

        Ok((request, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageutils_core::{ErrorKind, Operation};

    fn base_args() -> Arguments {
        Arguments {
            bytes: Some(vec![1, 2, 3]),
            quality: Some(90),
            format: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_method_names_round_trip() {
        for method in [Method::Crop, Method::Rotate, Method::Resize, Method::ResizeToMax] {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
        }
    }

    #[test]
    fn test_unknown_method() {
        let call = MethodCall::new("flip", base_args());
        assert_eq!(
            call.into_request(),
            Err(BoundaryError::UnknownMethod("flip".to_string()))
        );
        // Names are case-sensitive
        assert!("ResizeToMax".parse::<Method>().is_err());
    }

    #[test]
    fn test_crop_arguments() {
        let args = Arguments {
            x: Some(10),
            y: Some(20),
            width: Some(30),
            height: Some(40),
            ..base_args()
        };
        let (request, bytes) = MethodCall::new("crop", args).into_request().unwrap();

        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(request, TransformRequest::crop(10, 20, 30, 40, 90, 0));
    }

    #[test]
    fn test_resize_to_max_arguments() {
        let args = Arguments {
            max_size: Some(256),
            format: Some(2),
            ..base_args()
        };
        let (request, _) = MethodCall::new("resizeToMax", args).into_request().unwrap();

        assert_eq!(request.operation, Operation::ResizeToMax { max_size: 256 });
        assert_eq!(request.format, 2);
    }

    #[test]
    fn test_missing_argument() {
        let args = Arguments {
            dest_width: Some(100),
            ..base_args()
        };
        let err = MethodCall::new("resize", args).into_request().unwrap_err();
        assert_eq!(
            err,
            BoundaryError::InvalidArguments("missing argument `destHeight`".to_string())
        );
        assert_eq!(err.kind(), "invalid_arguments");

        let args = Arguments {
            angle: Some(90),
            ..Default::default()
        };
        let err = MethodCall::new("rotate", args).into_request().unwrap_err();
        assert_eq!(
            err,
            BoundaryError::InvalidArguments("missing argument `bytes`".to_string())
        );
    }

    #[test]
    fn test_operation_error_kind() {
        let err: BoundaryError = OperationError::from(imageutils_core::DecodeError::Empty).into();
        assert_eq!(err.kind(), ErrorKind::Decode.as_str());
    }
}
