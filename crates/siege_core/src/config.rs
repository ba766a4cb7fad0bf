use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Worker count used when the caller does not override it.
pub const DEFAULT_CONCURRENCY: usize = 128;
/// Per-request timeout used when the caller does not override it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Minimum spacing between progress checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: Duration = Duration::from_secs(30);

/// Immutable configuration snapshot for one replay run.
///
/// Validated once before any worker starts; workers only ever see it
/// read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of concurrent fetch workers, at least 1.
    pub concurrency: usize,
    /// Base URL every request path is appended to.
    pub target_host: String,
    /// Optional Host header override sent with every request.
    pub target_vhost: Option<String>,
    /// Dispatch as fast as the queue accepts instead of mirroring recorded
    /// pacing.
    pub flood: bool,
    /// Upper bound on one request, connect included.
    pub request_timeout: Duration,
    /// Minimum spacing between progress checkpoint lines.
    pub checkpoint_interval: Duration,
}

impl RunConfig {
    /// Configuration for `target_host` with defaults for everything else.
    pub fn new(target_host: impl Into<String>) -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            target_host: target_host.into(),
            target_vhost: None,
            flood: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }

    /// Rejects any configuration a run must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        let parsed = Url::parse(&self.target_host)
            .map_err(|err| ConfigError::InvalidTargetHost(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidTargetHost(format!(
                "unsupported scheme {:?}",
                parsed.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        if self.checkpoint_interval.is_zero() {
            return Err(ConfigError::ZeroCheckpointInterval);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("target host is not a usable base url: {0}")]
    InvalidTargetHost(String),
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("checkpoint interval must be greater than zero")]
    ZeroCheckpointInterval,
}
