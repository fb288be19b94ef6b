//! Logging setup for the `sird` binary.
//!
//! Diagnostics go to stderr through `log4rs` so stdout carries only the report
//! (and can be piped or diffed). The library itself only uses the `log` macros.

use clap::ValueEnum;
use log::LevelFilter;
use log4rs::Config;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::FitError;

// ISO 8601 timestamp and colour coded level tag.
const DEFAULT_LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

/// Verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Build the stderr logging config for `level`.
pub fn build_config(level: LevelFilter) -> Result<Config, FitError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();

    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| FitError::InvalidConfig(format!("failed to build logging config: {e}")))
}

/// Install the global logger. Call once, before any work starts.
pub fn init_logging(level: LevelFilter) -> Result<(), FitError> {
    let config = build_config(level)?;
    log4rs::init_config(config)
        .map(|_handle| ())
        .map_err(|e| FitError::InvalidConfig(format!("failed to install logger: {e}")))
}
