//! Error types for scan-core operations.
//!
//! # Usage
//!
//! ```rust
//! use scan_core::{Error, IntensityBuffer};
//!
//! let err = IntensityBuffer::from_u8(4, 4, vec![0; 15]).unwrap_err();
//! assert!(matches!(err, Error::DimensionMismatch { .. }));
//! ```
//!
//! # Used By
//!
//! - [`crate::buffer::IntensityBuffer`] - Sample count validation
//! - [`crate::band::ThresholdQuery`] - Stack name validation
//! - `scan-io` - Wrapped into `IoError::Core`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core data model.
#[derive(Debug, Error)]
pub enum Error {
    /// Sample count does not match `width * height`.
    #[error("buffer holds {actual} samples, expected {width}x{height} = {expected}")]
    DimensionMismatch {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
        /// `width * height`
        expected: u64,
        /// Number of samples supplied
        actual: u64,
    },

    /// A query field is malformed beyond what coercion can repair.
    #[error("invalid query: {0}")]
    Validation(String),
}
