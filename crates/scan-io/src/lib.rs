//! # scan-io
//!
//! TIFF stack I/O for threshold scanning.
//!
//! - [`stack`] - First-frame decode of 8/16-bit grayscale stacks, header-only reads, TIFF writers
//! - [`Catalog`] - Directory of stacks, reference assets, name validation
//! - [`DecodeCache`] - Byte-budgeted LRU cache of decoded stacks
//! - [`sample`] / [`reference`] - Demo stacks, overlay mask, previews, downsampled stacks
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scan_io::Catalog;
//! use scan_core::{Band, filter::filter};
//!
//! let catalog = Catalog::new("img");
//! let summary = catalog.summary()?;
//! let decoded = catalog.decode(&summary.files[0])?;
//! let result = filter(&decoded.info, &decoded.buffer, Band::around(204.0, 20.0));
//! ```
//!
//! # Feature Flags
//!
//! - `imagery` - Sample generation, JPEG previews, PNG overlay (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

pub mod cache;
pub mod catalog;
pub mod stack;

#[cfg(feature = "imagery")]
pub mod reference;
#[cfg(feature = "imagery")]
pub mod resample;
#[cfg(feature = "imagery")]
pub mod sample;

pub use cache::{CacheStats, DecodeCache};
pub use catalog::Catalog;
pub use error::{IoError, IoResult};
pub use stack::DecodedStack;
