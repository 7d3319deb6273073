//! Operation-level error type.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::transform::GeometryError;

/// Any failure of a dispatched operation. Every variant is terminal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Coarse classification of an [`OperationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Geometry,
    Encode,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode",
            ErrorKind::Geometry => "geometry",
            ErrorKind::Encode => "encode",
        }
    }
}

impl OperationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::Decode(_) => ErrorKind::Decode,
            OperationError::Geometry(_) => ErrorKind::Geometry,
            OperationError::Encode(_) => ErrorKind::Encode,
        }
    }
}
