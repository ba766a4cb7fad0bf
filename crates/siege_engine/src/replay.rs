use std::fmt;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use siege_core::{ConfigError, ProgressReporter, RateGovernor, Record, RunConfig, Summary};
use thiserror::Error;

use crate::pool::{PoolError, WorkerPool};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Replays `records` against `config.target_host` and returns the final
/// tally.
///
/// The calling thread is both producer and harvester: it paces each record
/// through the governor, enqueues the target URL, and opportunistically
/// drains finished outcomes between dispatches. Records that arrive as
/// errors are logged and skipped without affecting the dispatched count.
/// Returns only once every dispatched URL has a classified outcome.
pub fn replay<I, E>(records: I, config: &RunConfig) -> Result<Summary, ReplayError>
where
    I: IntoIterator<Item = Result<Record, E>>,
    E: fmt::Display,
{
    config.validate()?;
    let pool = WorkerPool::start(config)?;

    let mut governor = RateGovernor::new(config.flood);
    let mut reporter = ProgressReporter::new(config.checkpoint_interval);
    let mut summary = Summary::new();
    let mut dispatched: u64 = 0;

    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping record: {err}");
                continue;
            }
        };

        if let Some(pause) = governor.pause_before(unix_now(), record.timestamp) {
            thread::sleep(pause);
        }

        let url = format!("{}{}", config.target_host, record.path);
        debug!("dispatching {url}");
        pool.dispatch(url);
        dispatched += 1;

        // Keep the tally close to current without ever stalling dispatch.
        while summary.total() < dispatched {
            match pool.try_harvest() {
                Some(outcome) => summary.record(outcome),
                None => break,
            }
        }
        if let Some(line) = reporter.checkpoint(&summary) {
            info!("{line}");
        }
    }

    pool.shutdown();

    // Correctness-critical: the run is not over until every dispatched URL
    // is accounted for.
    while summary.total() < dispatched {
        match pool.harvest() {
            Some(outcome) => {
                summary.record(outcome);
                if let Some(line) = reporter.checkpoint(&summary) {
                    info!("{line}");
                }
            }
            None => {
                warn!(
                    "response queue closed early: {} of {dispatched} outcomes accounted",
                    summary.total()
                );
                break;
            }
        }
    }

    Ok(summary)
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
