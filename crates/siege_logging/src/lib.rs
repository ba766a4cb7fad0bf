#![deny(missing_docs)]
//! Shared logging setup for the replay workspace.
//!
//! The CLI keeps stdout for its final summary line, so all log output goes
//! to stderr.

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, ConfigBuilder, TermLogger, TerminalMode};

/// Initializes the process-wide terminal logger at `level`.
///
/// Safely no-ops if a logger has already been installed.
pub fn initialize(level: LevelFilter) {
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        build_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}

/// Initializes a terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    initialize(level);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
