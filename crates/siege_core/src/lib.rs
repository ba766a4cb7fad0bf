//! Siege core: pure replay domain logic, no I/O.
mod config;
mod governor;
mod record;
mod report;
mod summary;

pub use config::{
    ConfigError, RunConfig, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_CONCURRENCY,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use governor::RateGovernor;
pub use record::Record;
pub use report::ProgressReporter;
pub use summary::{Outcome, Summary};
