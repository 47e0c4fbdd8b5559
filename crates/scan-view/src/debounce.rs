//! Coalescing debouncer driven by explicit timestamps.
//!
//! A [`Debouncer`] holds the latest value handed to [`Debouncer::call`] and
//! releases it once no newer value arrived for the quiet period. Nothing
//! runs on its own: the owner polls with the current [`Instant`], which keeps
//! the timing deterministic under test.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use scan_view::debounce::{Debouncer, Edge};
//!
//! let t0 = Instant::now();
//! let mut d = Debouncer::new(Duration::from_millis(500), Edge::Trailing);
//! assert_eq!(d.call(1, t0), None);
//! assert_eq!(d.call(2, t0 + Duration::from_millis(100)), None);
//! assert_eq!(d.poll(t0 + Duration::from_millis(599)), None);
//! assert_eq!(d.poll(t0 + Duration::from_millis(600)), Some(2));
//! ```

use std::time::{Duration, Instant};

/// Quiet period shared by the session's debouncers.
pub const DEBOUNCE_WAIT: Duration = Duration::from_millis(500);

/// Which edges of a burst release a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Only the last value, once the burst is over.
    Trailing,
    /// The first value immediately, and the last one after the burst if
    /// more calls arrived during it.
    LeadingTrailing,
}

/// Coalesces bursts of values into at most two deliveries.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    edge: Edge,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    /// Creates an idle debouncer.
    pub fn new(wait: Duration, edge: Edge) -> Self {
        Self {
            wait,
            edge,
            pending: None,
            deadline: None,
        }
    }

    /// Trailing-only debouncer with [`DEBOUNCE_WAIT`].
    pub fn trailing() -> Self {
        Self::new(DEBOUNCE_WAIT, Edge::Trailing)
    }

    /// Leading + trailing debouncer with [`DEBOUNCE_WAIT`].
    pub fn leading_trailing() -> Self {
        Self::new(DEBOUNCE_WAIT, Edge::LeadingTrailing)
    }

    /// Quiet period.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Submits a value at `now`.
    ///
    /// Returns the value right away only on the leading edge of a burst.
    /// Otherwise it replaces any pending value and restarts the quiet period.
    pub fn call(&mut self, value: T, now: Instant) -> Option<T> {
        let idle = self.deadline.is_none_or(|d| now >= d);
        self.deadline = Some(now + self.wait);

        if idle && self.edge == Edge::LeadingTrailing {
            self.pending = None;
            return Some(value);
        }
        self.pending = Some(value);
        None
    }

    /// Releases the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Releases the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    /// True while a value waits for its trailing edge.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and(self.deadline)
    }
}
