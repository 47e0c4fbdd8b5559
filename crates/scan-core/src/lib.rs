//! # scan-core
//!
//! Core types for threshold scanning of TIFF stacks.
//!
//! - [`IntensityBuffer`] - Per-pixel samples of one frame (8 or 16 bit)
//! - [`Band`], [`ThresholdQuery`] - Inclusive intensity band and the query that selects it
//! - [`filter::filter`] - Single-pass band scan with a hard result cap
//! - [`FilterResult`] - Response payload of a query
//! - [`project_offsets`] - Flat offsets to `(x, y)` points
//!
//! ## Crate Structure
//!
//! ```text
//! scan-core (this crate)
//!    ^
//!    +-- scan-io (TIFF decode, catalog, cache)
//!    +-- scan-view (view state, client session)
//!    +-- scan-server (HTTP surface)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod band;
pub mod buffer;
pub mod error;
pub mod filter;
pub mod project;
pub mod stack;

pub use band::{Band, FilterRequest, LooseNumber, ThresholdQuery, validate_stack_name};
pub use buffer::{IntensityBuffer, Samples};
pub use error::{Error, Result};
pub use filter::{BandScan, DATA_SIZE_LIMIT, FilterResponse, FilterResult};
pub use project::{ScatterPoint, project_offsets};
pub use stack::{CatalogSummary, StackInfo, pixel_weight_max};
