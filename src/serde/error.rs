//! Errors raised by the serde bridge.

use std::fmt::Display;

use crate::error::{DecodeError, EncodeError};

/// Error type for serde serialization/deserialization through a codec.
#[derive(Debug, thiserror::Error)]
pub enum SerdeError {
    /// The value tree holds a different kind than the Rust type expects.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The Rust type has no counterpart in a schema value tree.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Custom(String),
}

impl SerdeError {
    pub(crate) fn mismatch(expected: &str, actual: &str) -> Self {
        SerdeError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl serde::ser::Error for SerdeError {
    fn custom<T: Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}
