//! Reference image alignment.
//!
//! The reference preview is a plain image laid over the scatter canvas. When
//! the camera pans or zooms away from its initial state, the preview gets the
//! equivalent translate + scale so both stay registered.

use std::fmt;

use crate::state::ViewState;

/// Screen-space translate + uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Scale factor relative to the initial view.
    pub scale: f64,
    /// Horizontal translation in CSS pixels.
    pub x: f64,
    /// Vertical translation in CSS pixels.
    pub y: f64,
}

impl Alignment {
    /// No movement.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// CSS transform string: `translate({x}px, {y}px) scale({scale})`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `+ 0.0` turns -0 into 0
        write!(
            f,
            "translate({}px, {}px) scale({})",
            self.x + 0.0,
            self.y + 0.0,
            self.scale + 0.0
        )
    }
}

/// Transform that moves the reference image from `initial` to `current`.
///
/// `aspect = render_width / file_width` (1 when the file width is unknown)
/// converts world units to screen pixels at the initial zoom.
pub fn compute_alignment(
    initial: &ViewState,
    current: &ViewState,
    file_width: u32,
    render_width: f64,
) -> Alignment {
    let aspect = if file_width == 0 {
        1.0
    } else {
        render_width / file_width as f64
    };
    let scale = (current.zoom - initial.zoom).exp2();
    Alignment {
        scale,
        x: (initial.target[0] - current.target[0]) * aspect * scale,
        y: (initial.target[1] - current.target[1]) * aspect * scale,
    }
}

type MemoKey = (ViewState, ViewState, u32, f64);

/// Single-entry memo over [`compute_alignment`].
#[derive(Debug, Clone, Default)]
pub struct AlignmentMemo {
    last: Option<(MemoKey, Alignment)>,
}

impl AlignmentMemo {
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached alignment when all inputs match the previous call.
    pub fn get(
        &mut self,
        initial: &ViewState,
        current: &ViewState,
        file_width: u32,
        render_width: f64,
    ) -> Alignment {
        let key = (*initial, *current, file_width, render_width);
        if let Some((last_key, value)) = &self.last {
            if *last_key == key {
                return *value;
            }
        }
        let value = compute_alignment(initial, current, file_width, render_width);
        self.last = Some((key, value));
        value
    }
}
