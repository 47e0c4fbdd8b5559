//! Client session state machine.
//!
//! [`Session`] owns everything the scatter viewer shows: the catalog, the
//! current query controls, the last filter result and its scatter points, and
//! the camera. It performs no I/O. The host feeds it user input and
//! timestamps, sends the requests it hands out from [`Session::poll`], and
//! reports responses back with their generation.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use scan_core::{CatalogSummary, FilterResult};
//! use scan_view::Session;
//!
//! let t0 = Instant::now();
//! let mut session = Session::new();
//! session.apply_catalog(
//!     CatalogSummary { bits_per_sample: 8, files: vec!["0".into()], height: 2, width: 2 },
//!     t0,
//! );
//!
//! let request = session.poll(t0 + Duration::from_millis(500)).unwrap();
//! assert_eq!(request.query.center, 204.0);
//! assert!(session.is_loading());
//!
//! assert!(session.apply_result(request.generation, FilterResult::default()));
//! assert!(!session.is_loading());
//! ```

use std::ops::RangeInclusive;
use std::time::Instant;

use scan_core::{CatalogSummary, FilterRequest, FilterResult, ScatterPoint, ThresholdQuery, pixel_weight_max, project_offsets};
use tracing::{debug, trace, warn};

use crate::align::{Alignment, AlignmentMemo};
use crate::debounce::Debouncer;
use crate::sequence::{Generation, RequestSequencer};
use crate::state::{FileData, ViewState, derive_view_state};

/// Band half-width selected on startup.
pub const DEFAULT_DISTANCE: f64 = 20.0;

/// Marker size selected on startup.
pub const DEFAULT_MARKER_SIZE: f64 = 1.0;

/// Accepted marker sizes.
pub const MARKER_SIZE_RANGE: RangeInclusive<f64> = 0.25..=5.0;

/// Smallest rendered marker radius in pixels.
pub const MIN_RADIUS_PIXELS: f64 = 0.25;

/// Opacity of the label overlay when shown.
pub const OVERLAY_OPACITY: f64 = 0.2;

/// Fraction of the depth's maximum used as the initial pixel weight.
pub const INITIAL_WEIGHT_FRACTION: f64 = 0.8;

/// URL of the label overlay.
pub const OVERLAY_SOURCE: &str = "/img/reference/overlay.png";

/// Shown while the current result is truncated.
pub const TRUNCATION_WARNING: &str = "The data returned from this image has been truncated due to \
     file size limits. Please try either narrowing the filter distance or using smaller source images.";

/// A filter request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    /// Generation to report back with the response.
    pub generation: Generation,
    /// Query to run.
    pub query: ThresholdQuery,
}

impl PendingRequest {
    /// JSON body for `POST /api`.
    pub fn body(&self) -> FilterRequest {
        FilterRequest::from(&self.query)
    }
}

/// State of one viewer session.
#[derive(Debug)]
pub struct Session {
    files: Vec<String>,
    file: FileData,
    catalog_loaded: bool,

    selected: Option<String>,
    pixel_weight: f64,
    distance: f64,
    marker_size: f64,
    applied_marker_size: f64,
    show_overlay: bool,

    render_width: f64,
    initial_view: ViewState,
    view: ViewState,
    alignment: AlignmentMemo,

    result: FilterResult,
    points: Vec<ScatterPoint>,
    error: Option<String>,

    queries: Debouncer<ThresholdQuery>,
    marker: Debouncer<f64>,
    measure: Debouncer<f64>,
    sequencer: RequestSequencer,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session before the catalog has been loaded.
    pub fn new() -> Self {
        let file = FileData::default();
        let view = derive_view_state(&file, 0.0);
        Self {
            files: Vec::new(),
            file,
            catalog_loaded: false,
            selected: None,
            pixel_weight: 0.0,
            distance: DEFAULT_DISTANCE,
            marker_size: DEFAULT_MARKER_SIZE,
            applied_marker_size: DEFAULT_MARKER_SIZE,
            show_overlay: false,
            render_width: 0.0,
            initial_view: view,
            view,
            alignment: AlignmentMemo::new(),
            result: FilterResult::default(),
            points: Vec::new(),
            error: None,
            queries: Debouncer::trailing(),
            marker: Debouncer::trailing(),
            measure: Debouncer::leading_trailing(),
            sequencer: RequestSequencer::new(),
        }
    }

    // ------------------------------------------------------------------
    // Catalog and query controls
    // ------------------------------------------------------------------

    /// Applies the `/api/load` response: selects the first stack and sets
    /// the pixel weight to 80% of the depth's maximum.
    pub fn apply_catalog(&mut self, summary: CatalogSummary, now: Instant) {
        self.file = FileData::from(&summary);
        self.pixel_weight = (pixel_weight_max(summary.bits_per_sample) as f64 * INITIAL_WEIGHT_FRACTION).floor();
        self.selected = summary.files.first().cloned();
        self.files = summary.files;
        self.catalog_loaded = true;
        debug!(
            stacks = self.files.len(),
            width = self.file.width,
            height = self.file.height,
            bits = self.file.bits_per_sample,
            "catalog applied"
        );
        self.reset_views();
        self.schedule_query(now);
    }

    /// True once a catalog has been applied.
    pub fn is_catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    /// Stack names in catalog order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Catalog dimensions.
    pub fn file_data(&self) -> FileData {
        self.file
    }

    /// Selected stack.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects a stack from the catalog. Unknown names are ignored.
    pub fn select_stack(&mut self, name: &str, now: Instant) -> bool {
        if !self.files.iter().any(|f| f == name) {
            warn!(stack = name, "selection not in catalog");
            return false;
        }
        self.selected = Some(name.to_owned());
        self.schedule_query(now);
        true
    }

    /// Band center.
    pub fn pixel_weight(&self) -> f64 {
        self.pixel_weight
    }

    /// Sets the band center.
    pub fn set_pixel_weight(&mut self, value: f64, now: Instant) {
        self.pixel_weight = value;
        self.schedule_query(now);
    }

    /// Band half-width.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Sets the band half-width.
    pub fn set_distance(&mut self, value: f64, now: Instant) {
        self.distance = value;
        self.schedule_query(now);
    }

    /// Upper bound of the pixel weight and distance controls.
    pub fn pixel_weight_max(&self) -> u32 {
        pixel_weight_max(self.file.bits_per_sample)
    }

    fn schedule_query(&mut self, now: Instant) {
        let Some(image) = &self.selected else {
            return;
        };
        let query = ThresholdQuery::new(image.clone(), self.pixel_weight, self.distance);
        trace!(image = %query.image, center = query.center, distance = query.distance, "query scheduled");
        // Trailing-only: never releases on call.
        let _ = self.queries.call(query, now);
    }

    // ------------------------------------------------------------------
    // Markers and overlay
    // ------------------------------------------------------------------

    /// Marker size as shown on the control.
    pub fn marker_size(&self) -> f64 {
        self.marker_size
    }

    /// Sets the marker size (clamped to [`MARKER_SIZE_RANGE`]). The rendered
    /// radius follows after the quiet period.
    pub fn set_marker_size(&mut self, value: f64, now: Instant) {
        let size = value.clamp(*MARKER_SIZE_RANGE.start(), *MARKER_SIZE_RANGE.end());
        self.marker_size = size;
        if let Some(applied) = self.marker.call(size, now) {
            self.applied_marker_size = applied;
        }
    }

    /// Rendered marker radius in pixels.
    pub fn marker_radius(&self) -> f64 {
        (self.applied_marker_size / 2.0).max(MIN_RADIUS_PIXELS)
    }

    /// Shows or hides the label overlay.
    pub fn set_show_overlay(&mut self, show: bool) {
        self.show_overlay = show;
    }

    /// Flips overlay visibility.
    pub fn toggle_overlay(&mut self) {
        self.show_overlay = !self.show_overlay;
    }

    /// True if the overlay is shown.
    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    /// Overlay opacity: [`OVERLAY_OPACITY`] when shown, 0 otherwise.
    pub fn overlay_opacity(&self) -> f64 {
        if self.show_overlay { OVERLAY_OPACITY } else { 0.0 }
    }

    /// URL of the selected stack's reference preview.
    pub fn reference_source(&self) -> Option<String> {
        self.selected.as_ref().map(|name| format!("/img/reference/{name}.jpg"))
    }

    // ------------------------------------------------------------------
    // Canvas and camera
    // ------------------------------------------------------------------

    /// Reports the canvas width. The first report of a burst applies
    /// immediately, the last one after the quiet period.
    pub fn measure(&mut self, width: f64, now: Instant) {
        if let Some(width) = self.measure.call(width, now) {
            self.apply_render_width(width);
        }
    }

    fn apply_render_width(&mut self, width: f64) {
        if width == self.render_width {
            return;
        }
        trace!(width, "render width changed");
        self.render_width = width;
        self.reset_views();
    }

    fn reset_views(&mut self) {
        let view = derive_view_state(&self.file, self.render_width);
        self.initial_view = view;
        self.view = view;
    }

    /// Measured canvas width.
    pub fn render_width(&self) -> f64 {
        self.render_width
    }

    /// Canvas height matching the frame's aspect ratio.
    pub fn render_height(&self) -> f64 {
        self.file.render_height(self.render_width)
    }

    /// Live camera.
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Camera the view resets to.
    pub fn initial_view_state(&self) -> &ViewState {
        &self.initial_view
    }

    /// Replaces the live camera, e.g. from a renderer's controller.
    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    /// Drags the live camera by screen pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view.pan(dx, dy);
    }

    /// Zooms the live camera within its bounds.
    pub fn zoom_by(&mut self, delta: f64) {
        self.view.zoom_by(delta);
    }

    /// Restores the live camera to the initial one.
    pub fn reset_zoom(&mut self) {
        self.view = self.initial_view;
    }

    /// Transform keeping the reference preview registered with the canvas.
    pub fn alignment(&mut self) -> Alignment {
        self.alignment
            .get(&self.initial_view, &self.view, self.file.width, self.render_width)
    }

    /// [`Session::alignment`] as a CSS transform.
    pub fn reference_transform(&mut self) -> String {
        self.alignment().to_css()
    }

    // ------------------------------------------------------------------
    // Timers and responses
    // ------------------------------------------------------------------

    /// Advances debouncers to `now`. Returns a filter request when the query
    /// controls have settled.
    pub fn poll(&mut self, now: Instant) -> Option<PendingRequest> {
        if let Some(size) = self.marker.poll(now) {
            self.applied_marker_size = size;
        }
        if let Some(width) = self.measure.poll(now) {
            self.apply_render_width(width);
        }

        let query = self.queries.poll(now)?;
        let generation = self.sequencer.issue();
        debug!(generation, image = %query.image, center = query.center, distance = query.distance, "filter request issued");
        Some(PendingRequest { generation, query })
    }

    /// Earliest instant at which [`Session::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.queries.deadline(), self.marker.deadline(), self.measure.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Applies a filter response. Responses to superseded requests are
    /// dropped and return false.
    pub fn apply_result(&mut self, generation: Generation, result: FilterResult) -> bool {
        if !self.sequencer.settle(generation) {
            debug!(generation, latest = self.sequencer.latest(), "dropping stale filter response");
            return false;
        }
        self.points = project_offsets(&result.offsets, result.width);
        debug!(
            generation,
            points = self.points.len(),
            truncated = result.truncated,
            "filter result applied"
        );
        self.result = result;
        self.error = None;
        true
    }

    /// Records a failed request. Failures of superseded requests are ignored.
    pub fn fail_request(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.sequencer.settle(generation) {
            return false;
        }
        let message = message.into();
        warn!(generation, %message, "filter request failed");
        self.error = Some(message);
        true
    }

    /// True while the latest request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.sequencer.in_flight()
    }

    /// Message of the last failed request, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last applied filter result.
    pub fn result(&self) -> &FilterResult {
        &self.result
    }

    /// Scatter points of the last applied result.
    pub fn scatter_points(&self) -> &[ScatterPoint] {
        &self.points
    }

    /// Warning to show when the settled result is truncated.
    pub fn truncation_warning(&self) -> Option<&'static str> {
        (!self.is_loading() && self.result.truncated).then_some(TRUNCATION_WARNING)
    }
}
