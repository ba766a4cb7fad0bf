use std::collections::BTreeMap;
use std::fmt;

/// Classified result of one replayed request. Exactly one is produced per
/// dispatched URL and consumed exactly once by the harvester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A response arrived with a 2xx status.
    Success(u16),
    /// A response arrived with any other status.
    HttpError(u16),
    /// The transport reported a timeout before a status was read.
    Timeout,
    /// Any other network-level failure.
    NetworkError,
}

impl Outcome {
    /// Classification for a received response status.
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Outcome::Success(status)
        } else {
            Outcome::HttpError(status)
        }
    }
}

/// Running tally of harvested outcomes.
///
/// Owned exclusively by the harvester; workers report outcomes over the
/// response channel and never touch this. After the final harvest,
/// `total == success + http errors + timeouts + network errors` and equals
/// the number of URLs dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    total: u64,
    success: u64,
    http_errors: BTreeMap<u16, u64>,
    timeouts: u64,
    network_errors: u64,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts one harvested outcome.
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success(_) => self.success += 1,
            Outcome::HttpError(status) => {
                *self.http_errors.entry(status).or_insert(0) += 1;
            }
            Outcome::Timeout => self.timeouts += 1,
            Outcome::NetworkError => self.network_errors += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn success(&self) -> u64 {
        self.success
    }

    /// Count of responses carrying this non-2xx status.
    pub fn http_error(&self, status: u16) -> u64 {
        self.http_errors.get(&status).copied().unwrap_or(0)
    }

    pub fn http_errors(&self) -> &BTreeMap<u16, u64> {
        &self.http_errors
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts
    }

    pub fn network_errors(&self) -> u64 {
        self.network_errors
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total={} success={}", self.total, self.success)?;
        for (status, count) in &self.http_errors {
            write!(f, " http-{status}={count}")?;
        }
        write!(
            f,
            " timeout={} network-error={}",
            self.timeouts, self.network_errors
        )
    }
}
