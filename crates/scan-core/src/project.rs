//! Flat offset to pixel coordinate projection.

use serde::{Deserialize, Serialize};

/// A pixel position in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl ScatterPoint {
    /// Projects one flat offset.
    #[inline]
    pub fn from_offset(offset: u64, width: u32) -> Self {
        let w = width as u64;
        Self {
            x: (offset % w) as u32,
            y: (offset / w) as u32,
        }
    }

    /// Flat offset of this point for a given width.
    #[inline]
    pub fn offset(&self, width: u32) -> u64 {
        self.y as u64 * width as u64 + self.x as u64
    }
}

/// Converts filter offsets into points.
///
/// Offsets are assumed to lie in `0..width * height`; a zero width yields
/// no points.
pub fn project_offsets(offsets: &[u64], width: u32) -> Vec<ScatterPoint> {
    if width == 0 {
        return Vec::new();
    }
    offsets
        .iter()
        .map(|&o| ScatterPoint::from_offset(o, width))
        .collect()
}
