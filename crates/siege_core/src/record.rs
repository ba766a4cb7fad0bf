/// One replayable log entry: when the original request arrived and what it
/// asked for. Produced by the record source, consumed exactly once by the
/// replay loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Original arrival time, unix seconds.
    pub timestamp: f64,
    /// Request path, appended verbatim to the target host.
    pub path: String,
}

impl Record {
    pub fn new(timestamp: f64, path: impl Into<String>) -> Self {
        Self {
            timestamp,
            path: path.into(),
        }
    }
}
