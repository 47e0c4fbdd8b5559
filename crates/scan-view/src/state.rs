//! Camera view state for the scatter canvas.
//!
//! The view is orthographic with y pointing down. `zoom` is a base-2
//! exponent: one world unit spans `2^zoom` screen pixels.

use scan_core::CatalogSummary;
use serde::{Deserialize, Serialize};

/// Zoom levels available below the initial fit.
pub const ZOOM_OUT_RANGE: f64 = 1.0;

/// Zoom levels available above the initial fit.
pub const ZOOM_IN_RANGE: f64 = 40.0;

/// Stack dimensions the view is laid out for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// Bits per sample of the catalog's stacks.
    pub bits_per_sample: u16,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl FileData {
    /// Dimensions without a known depth.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            bits_per_sample: 0,
            width,
            height,
        }
    }

    /// Height of the canvas when the frame is drawn `render_width` pixels wide.
    ///
    /// Zero until both widths are known.
    pub fn render_height(&self, render_width: f64) -> f64 {
        if self.width == 0 || render_width <= 0.0 {
            return 0.0;
        }
        self.height as f64 * render_width / self.width as f64
    }
}

impl From<&CatalogSummary> for FileData {
    fn from(summary: &CatalogSummary) -> Self {
        Self {
            bits_per_sample: summary.bits_per_sample,
            width: summary.width,
            height: summary.height,
        }
    }
}

/// Camera target, zoom and zoom bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Look-at point in world (pixel) coordinates.
    pub target: [f64; 3],
    /// Base-2 zoom exponent.
    pub zoom: f64,
    /// Lowest zoom reachable by [`ViewState::zoom_by`].
    pub min_zoom: f64,
    /// Highest zoom reachable by [`ViewState::zoom_by`].
    pub max_zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        derive_view_state(&FileData::default(), 0.0)
    }
}

impl ViewState {
    /// Moves the target by a screen-space drag of `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let scale = self.zoom.exp2();
        self.target[0] -= dx / scale;
        self.target[1] -= dy / scale;
    }

    /// Adds `delta` to the zoom, clamped to `[min_zoom, max_zoom]`.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
    }
}

/// View state that fits a frame into a canvas `render_width` pixels wide.
///
/// Before the canvas is measured (or before dimensions are known) the zoom
/// falls back to 1.
pub fn derive_view_state(file: &FileData, render_width: f64) -> ViewState {
    let zoom = if render_width > 0.0 && file.width > 0 {
        (render_width / file.width as f64).log2()
    } else {
        1.0
    };
    ViewState {
        target: [file.width as f64 / 2.0, file.height as f64 / 2.0, 0.0],
        zoom,
        min_zoom: zoom - ZOOM_OUT_RANGE,
        max_zoom: zoom + ZOOM_IN_RANGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fits_tall_frame_into_half_width() {
        let v = derive_view_state(&FileData::new(1000, 1500), 500.0);
        assert_relative_eq!(v.zoom, -1.0);
        assert_eq!(v.target, [500.0, 750.0, 0.0]);
        assert_relative_eq!(v.min_zoom, -2.0);
        assert_relative_eq!(v.max_zoom, 39.0);
    }

    #[test]
    fn unmeasured_canvas_uses_unit_zoom() {
        let v = derive_view_state(&FileData::new(1000, 1500), 0.0);
        assert_eq!(v.zoom, 1.0);
        let v = derive_view_state(&FileData::default(), 800.0);
        assert_eq!(v.zoom, 1.0);
        assert_eq!(v.target, [0.0, 0.0, 0.0]);
        assert_eq!((v.min_zoom, v.max_zoom), (0.0, 41.0));
    }

    #[test]
    fn pan_is_scaled_by_zoom() {
        let mut v = derive_view_state(&FileData::new(1000, 1000), 500.0);
        v.pan(10.0, -20.0);
        // zoom -1: one screen pixel is two world units.
        assert_relative_eq!(v.target[0], 480.0);
        assert_relative_eq!(v.target[1], 540.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = derive_view_state(&FileData::new(100, 100), 100.0);
        v.zoom_by(-5.0);
        assert_eq!(v.zoom, -1.0);
        v.zoom_by(100.0);
        assert_eq!(v.zoom, 40.0);
        v.zoom_by(-0.5);
        assert_eq!(v.zoom, 39.5);
    }

    #[test]
    fn render_height_keeps_aspect() {
        let f = FileData::new(1000, 1500);
        assert_eq!(f.render_height(500.0), 750.0);
        assert_eq!(f.render_height(0.0), 0.0);
        assert_eq!(FileData::default().render_height(500.0), 0.0);
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_value(derive_view_state(&FileData::new(2, 2), 0.0)).unwrap();
        assert!(json.get("minZoom").is_some());
        assert!(json.get("maxZoom").is_some());
    }
}
