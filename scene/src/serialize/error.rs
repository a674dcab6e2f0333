//! Error type for subtree encoding and decoding.

use snapclip_core::{CodecFormat, SnapshotError};
use thiserror::Error;

/// Errors produced while encoding or decoding a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format encoding error (RON/bincode).
    #[error("failed to encode subtree: {0}")]
    Encode(String),
    /// Format decoding error.
    #[error("failed to decode subtree: {0}")]
    Decode(String),
    /// The data decoded but does not describe a well-formed subtree.
    #[error("malformed subtree: {0}")]
    Malformed(String),
    /// The requested format was not compiled in.
    #[error("format {0:?} is not enabled in this build")]
    Unsupported(CodecFormat),
}

impl From<FormatError> for SnapshotError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::Unsupported(_) => SnapshotError::Config(err.to_string()),
            _ => SnapshotError::Codec(err.to_string()),
        }
    }
}
