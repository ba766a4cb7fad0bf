use std::time::{Duration, Instant};

use crate::Summary;

/// Gates periodic checkpoint lines to at most one per interval.
///
/// Carries the instant and total of the previous checkpoint so each line can
/// report the outcome rate since then.
#[derive(Debug)]
pub struct ProgressReporter {
    interval: Duration,
    last_instant: Instant,
    last_total: u64,
}

impl ProgressReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_instant: Instant::now(),
            last_total: 0,
        }
    }

    /// A checkpoint line if one is due at `now`, else `None`.
    ///
    /// Nothing is due while the tally is still empty or inside the interval.
    pub fn checkpoint_at(&mut self, now: Instant, summary: &Summary) -> Option<String> {
        if summary.total() == 0 {
            return None;
        }
        let elapsed = now.duration_since(self.last_instant);
        if elapsed < self.interval {
            return None;
        }
        let harvested = summary.total() - self.last_total;
        let rate = harvested as f64 / elapsed.as_secs_f64();
        self.last_instant = now;
        self.last_total = summary.total();
        Some(format!(
            "{harvested} outcomes in {:.1}s ({rate:.1}/s), {summary}",
            elapsed.as_secs_f64()
        ))
    }

    /// Convenience wrapper over [`Self::checkpoint_at`] using the real clock.
    pub fn checkpoint(&mut self, summary: &Summary) -> Option<String> {
        self.checkpoint_at(Instant::now(), summary)
    }
}
