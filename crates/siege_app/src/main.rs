//! logsiege: replay recorded access-log traffic against a target host.

mod source;

use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use siege_core::{RunConfig, DEFAULT_CONCURRENCY};
use siege_engine::replay;

/// Replay recorded access-log traffic against a target host.
///
/// Log lines are read from stdin; the final tally is written to stdout.
#[derive(Parser, Debug)]
#[command(name = "logsiege", version)]
struct Cli {
    /// Base URL requests are sent to (example: http://staging.example.com)
    #[arg(long)]
    target_host: String,

    /// Send this Host header instead of the one derived from the target
    #[arg(long)]
    target_vhost: Option<String>,

    /// Allow no more than this many requests in flight at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Dispatch as fast as possible instead of mirroring recorded pacing
    #[arg(long)]
    flood: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30.0)]
    timeout: f64,

    /// Seconds between progress checkpoint lines
    #[arg(long, default_value_t = 30.0)]
    checkpoint_interval: f64,

    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<RunConfig> {
        Ok(RunConfig {
            concurrency: self.concurrency,
            target_host: self.target_host,
            target_vhost: self.target_vhost,
            flood: self.flood,
            request_timeout: seconds("timeout", self.timeout)?,
            checkpoint_interval: seconds("checkpoint-interval", self.checkpoint_interval)?,
        })
    }
}

fn seconds(option: &str, value: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("invalid value for --{option}: {value}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    siege_logging::initialize(cli.log_level);

    let config = cli.into_config()?;
    config.validate().context("invalid configuration")?;

    let stdin = io::stdin();
    let summary = replay(source::records(stdin.lock()), &config)?;
    println!("{summary}");
    Ok(())
}
