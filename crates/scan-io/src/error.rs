//! Error types for stack I/O.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing, unreadable or corrupt stack.
    #[error("decode error: {0}")]
    Decode(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(String),

    /// Stack is not single-channel 8 or 16 bit.
    #[error("unsupported color type: {0}")]
    UnsupportedColorType(String),

    /// The catalog has no stacks.
    #[error("no .tif stacks found in {0}")]
    NotFound(String),

    /// Stack name rejected before touching the filesystem.
    #[error("invalid stack name: {0}")]
    InvalidName(String),

    /// Core data model error.
    #[error(transparent)]
    Core(#[from] scan_core::Error),
}

impl IoError {
    /// True for errors caused by the caller's input rather than the files.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidName(_) | Self::Core(scan_core::Error::Validation(_))
        )
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

pub(crate) fn decode_err(e: tiff::TiffError) -> IoError {
    IoError::Decode(e.to_string())
}

pub(crate) fn encode_err(e: impl std::fmt::Display) -> IoError {
    IoError::Encode(e.to_string())
}
