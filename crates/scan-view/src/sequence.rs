//! Request generations.
//!
//! Every issued filter request carries a generation. Responses are matched
//! against the most recent one, so a slow response to an old query cannot
//! overwrite the result of a newer query.

/// Generation counter for invalidating stale results.
pub type Generation = u64;

/// Issues generations and tracks which one is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequencer {
    latest: Generation,
    settled: Generation,
}

impl RequestSequencer {
    /// No request issued yet.
    pub const fn new() -> Self {
        Self {
            latest: 0,
            settled: 0,
        }
    }

    /// Starts a new request. Generations begin at 1.
    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        self.latest
    }

    /// Most recently issued generation (0 if none).
    pub const fn latest(&self) -> Generation {
        self.latest
    }

    /// True if `generation` is the latest issued.
    pub const fn is_latest(&self, generation: Generation) -> bool {
        generation != 0 && generation == self.latest
    }

    /// True while the latest request has not been settled.
    pub const fn in_flight(&self) -> bool {
        self.settled != self.latest
    }

    /// Settles `generation` if it is the latest. Returns false for stale or
    /// already settled generations.
    pub fn settle(&mut self, generation: Generation) -> bool {
        if !self.is_latest(generation) || self.settled == generation {
            return false;
        }
        self.settled = generation;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_settles() {
        let mut seq = RequestSequencer::new();
        assert!(!seq.in_flight());
        let a = seq.issue();
        let b = seq.issue();
        assert!(seq.in_flight());
        assert!(!seq.settle(a));
        assert!(seq.settle(b));
        assert!(!seq.settle(b));
        assert!(!seq.in_flight());
    }

    #[test]
    fn zero_is_never_latest() {
        let seq = RequestSequencer::new();
        assert!(!seq.is_latest(0));
    }
}
