//! Stack metadata.
//!
//! A stack is a multi-page TIFF; only the first frame is ever read. The
//! metadata here is what the decoder reports for that frame and stays
//! immutable for the lifetime of a request.

use serde::{Deserialize, Serialize};

/// Maximum pixel weight for 8-bit stacks.
pub const PIXEL_WEIGHT_MAX_8: u32 = 255;

/// Maximum pixel weight for 16-bit stacks.
pub const PIXEL_WEIGHT_MAX_16: u32 = 65535;

/// TIFF `ResolutionUnit` value for inches (the TIFF default).
pub const RESOLUTION_UNIT_INCH: u16 = 2;

/// Upper bound of the pixel-weight range for a bit depth.
///
/// Anything that is not 16-bit is treated as 8-bit.
#[inline]
pub const fn pixel_weight_max(bits_per_sample: u16) -> u32 {
    if bits_per_sample == 16 {
        PIXEL_WEIGHT_MAX_16
    } else {
        PIXEL_WEIGHT_MAX_8
    }
}

/// Metadata of a decoded stack (first frame).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackInfo {
    /// Stack name (file stem).
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits per sample, 8 or 16.
    pub bits_per_sample: u16,
    /// TIFF resolution unit (2 = inch, 3 = centimeter).
    pub resolution_unit: u16,
    /// Horizontal resolution, if the file carries one.
    pub x_resolution: Option<f64>,
    /// Vertical resolution, if the file carries one.
    pub y_resolution: Option<f64>,
}

impl StackInfo {
    /// Total pixel count (`width * height`).
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Upper bound of the pixel-weight slider for this stack.
    #[inline]
    pub fn pixel_weight_max(&self) -> u32 {
        pixel_weight_max(self.bits_per_sample)
    }
}

/// Catalog listing returned by `GET /api/load`.
///
/// Dimensions and depth come from the first stack; all stacks in a
/// directory are assumed to share them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    /// Bits per sample of the representative stack.
    pub bits_per_sample: u16,
    /// Stack names, sorted.
    pub files: Vec<String>,
    /// Height of the representative stack.
    pub height: u32,
    /// Width of the representative stack.
    pub width: u32,
}

impl CatalogSummary {
    /// Upper bound of the pixel-weight slider.
    #[inline]
    pub fn pixel_weight_max(&self) -> u32 {
        pixel_weight_max(self.bits_per_sample)
    }
}
