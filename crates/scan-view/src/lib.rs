//! # scan-view
//!
//! Renderer-agnostic client logic for the stack scanner.
//!
//! - [`state`] - Camera view state, initial fit, pan and clamped zoom
//! - [`align`] - Reference image transform that follows the camera
//! - [`debounce`] - Coalescing debouncers driven by explicit timestamps
//! - [`sequence`] - Request generations for dropping stale responses
//! - [`Session`] - The viewer's state machine tying the above together
//!
//! Nothing here performs I/O or reads the clock; callers pass `Instant`s in
//! and carry requests out.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod align;
pub mod debounce;
pub mod sequence;
pub mod session;
pub mod state;

pub use align::{Alignment, AlignmentMemo, compute_alignment};
pub use debounce::{DEBOUNCE_WAIT, Debouncer, Edge};
pub use sequence::{Generation, RequestSequencer};
pub use session::{PendingRequest, Session};
pub use state::{FileData, ViewState, derive_view_state};
