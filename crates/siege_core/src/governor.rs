use std::time::Duration;

/// Pacing rule that reproduces the recorded inter-arrival spacing.
///
/// The first record fixes `delta`, the offset between the wall clock and the
/// recorded timeline. Every later record is held back until its own offset
/// has grown to at least `delta`. A replay that starts behind the recorded
/// timeline never catches up artificially, and one that falls behind (slow
/// workers, slow network) proceeds without extra waiting.
#[derive(Debug, Clone)]
pub struct RateGovernor {
    flood: bool,
    delta: Option<f64>,
}

impl RateGovernor {
    pub fn new(flood: bool) -> Self {
        Self { flood, delta: None }
    }

    /// How long the producer must wait before dispatching a record first
    /// seen at wall-clock time `now` (unix seconds).
    ///
    /// Returns `None` when the record may go out immediately. The first
    /// record establishes the baseline even in flood mode, so turning flood
    /// off mid-run would resume pacing against the original baseline.
    pub fn pause_before(&mut self, now: f64, record_timestamp: f64) -> Option<Duration> {
        let delta = *self.delta.get_or_insert(now - record_timestamp);
        if self.flood {
            return None;
        }
        let lag = now - record_timestamp;
        if lag < delta {
            Some(Duration::from_secs_f64(delta - lag))
        } else {
            None
        }
    }

    /// True once a first record has fixed the wall-clock offset.
    pub fn baseline_established(&self) -> bool {
        self.delta.is_some()
    }
}
