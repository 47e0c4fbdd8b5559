//! Band filter over an intensity buffer.
//!
//! Scans every sample once in offset order and keeps the flat offsets whose
//! value falls inside the band. At most [`DATA_SIZE_LIMIT`] offsets are
//! kept; the result is flagged as truncated when more pixels matched.
//!
//! # Example
//!
//! ```rust
//! use scan_core::{Band, IntensityBuffer, filter::scan_band};
//!
//! let buf = IntensityBuffer::from_u8(4, 1, vec![10, 200, 210, 0]).unwrap();
//! let scan = scan_band(&buf, Band::around(205.0, 5.0), 10);
//! assert_eq!(scan.offsets, vec![1, 2]);
//! assert!(!scan.truncated);
//! ```

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::band::Band;
use crate::buffer::{IntensityBuffer, Samples};
use crate::stack::{RESOLUTION_UNIT_INCH, StackInfo};

/// Maximum number of offsets returned per query.
///
/// Raising it lets larger stacks through at the cost of response size and
/// client render time.
pub const DATA_SIZE_LIMIT: usize = 1_000_000;

/// Offsets selected by one scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BandScan {
    /// Matching offsets in ascending order, at most `cap` of them.
    pub offsets: Vec<u64>,
    /// More than `cap` pixels matched.
    pub truncated: bool,
}

/// Scans `buffer` for samples inside `band`, keeping the first `cap` matches.
///
/// Stops as soon as a match beyond `cap` proves truncation.
pub fn scan_band(buffer: &IntensityBuffer, band: Band, cap: usize) -> BandScan {
    let samples = buffer.samples();
    let Some(range) = band.sample_range(samples.max_value()) else {
        trace!(min = band.min, max = band.max, "band matches no representable sample");
        return BandScan::default();
    };
    match samples {
        Samples::U8(v) => scan_samples(v, range, cap),
        Samples::U16(v) => scan_samples(v, range, cap),
    }
}

fn scan_samples<T: Copy + Into<u32>>(samples: &[T], range: RangeInclusive<u32>, cap: usize) -> BandScan {
    let (lo, hi) = (*range.start(), *range.end());
    let mut offsets = Vec::new();
    for (i, &s) in samples.iter().enumerate() {
        let v: u32 = s.into();
        if lo <= v && v <= hi {
            if offsets.len() == cap {
                return BandScan {
                    offsets,
                    truncated: true,
                };
            }
            offsets.push(i as u64);
        }
    }
    BandScan {
        offsets,
        truncated: false,
    }
}

/// Response payload of a threshold query.
///
/// Serialized field names and order match the `POST /api` contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    /// Bits per sample of the stack.
    pub bits_per_sample: u16,
    /// Height in pixels.
    pub height: u32,
    /// Matching flat offsets, ascending.
    #[serde(rename = "offset")]
    pub offsets: Vec<u64>,
    /// TIFF resolution unit.
    pub resolution_unit: u16,
    /// Total pixel count.
    #[serde(rename = "size")]
    pub total_size: u64,
    /// More than [`DATA_SIZE_LIMIT`] pixels matched.
    pub truncated: bool,
    /// Horizontal resolution.
    pub x_resolution: Option<f64>,
    /// Width in pixels.
    pub width: u32,
    /// Vertical resolution.
    pub y_resolution: Option<f64>,
}

impl Default for FilterResult {
    /// Placeholder shown before the first response arrives.
    fn default() -> Self {
        Self {
            bits_per_sample: 0,
            height: 100,
            offsets: Vec::new(),
            resolution_unit: RESOLUTION_UNIT_INCH,
            total_size: 0,
            truncated: false,
            x_resolution: None,
            width: 100,
            y_resolution: None,
        }
    }
}

impl FilterResult {
    /// Builds a result from stack metadata and a scan.
    pub fn from_scan(info: &StackInfo, scan: BandScan) -> Self {
        Self {
            bits_per_sample: info.bits_per_sample,
            height: info.height,
            offsets: scan.offsets,
            resolution_unit: info.resolution_unit,
            total_size: info.total_size(),
            truncated: scan.truncated,
            x_resolution: info.x_resolution,
            width: info.width,
            y_resolution: info.y_resolution,
        }
    }
}

/// Wire envelope: `{ "message": FilterResult }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResponse {
    /// The filter result.
    pub message: FilterResult,
}

/// Runs the band filter with the standard cap.
pub fn filter(info: &StackInfo, buffer: &IntensityBuffer, band: Band) -> FilterResult {
    filter_capped(info, buffer, band, DATA_SIZE_LIMIT)
}

/// Runs the band filter with an explicit cap.
pub fn filter_capped(info: &StackInfo, buffer: &IntensityBuffer, band: Band, cap: usize) -> FilterResult {
    let scan = scan_band(buffer, band, cap);
    debug!(
        stack = %info.name,
        min = band.min,
        max = band.max,
        matched = scan.offsets.len(),
        truncated = scan.truncated,
        "band filter"
    );
    FilterResult::from_scan(info, scan)
}
