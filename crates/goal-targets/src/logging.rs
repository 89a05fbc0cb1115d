//! Process-wide logging setup for the CLI and robot-side binaries.
//!
//! Library code only emits through the `log` facade (and `tracing` spans with
//! the `tracing` feature); binaries pick a backend once at startup. `RUST_LOG`
//! overrides the level passed in.

use log::LevelFilter;

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("a logger is already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[cfg(feature = "tracing")]
    #[error("a tracing subscriber is already installed: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install an `env_logger` backend writing `[time LEVEL target] message`
/// lines to stderr.
pub fn init_logging(level: LevelFilter) -> Result<(), LoggingError> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}

/// Install a `tracing` fmt subscriber and route `log` records into it.
///
/// Span close events are emitted so `analyze_rgb`, `GoalDetector::analyze`
/// and `Sequencer::step` report their timing. `json` switches to flattened
/// JSON events for log shipping off the robot.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        tracing::subscriber::set_global_default(builder.json().flatten_event(true).finish())?;
    } else {
        tracing::subscriber::set_global_default(
            builder.with_timer(fmt::time::Uptime::default()).finish(),
        )?;
    }
    tracing_log::LogTracer::init_with_filter(level)?;
    Ok(())
}
