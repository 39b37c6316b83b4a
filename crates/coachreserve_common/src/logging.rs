//! Logging utilities for the CoachReserve application.
//!
//! Every crate logs through `tracing`; this module installs the subscriber
//! once at startup. Binaries that own the terminal hand in a file writer so
//! log lines never interleave with the UI.

use std::str::FromStr;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO, writing to stderr.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level, writing to stderr.
pub fn init_with_level(level: Level) {
    init_with_writer(level, std::io::stderr);
}

/// Initialize the tracing subscriber from a level name such as `"debug"`.
///
/// Unknown names fall back to INFO with a warning.
pub fn init_from_name<W>(level: &str, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match parse_level(level) {
        Some(level) => init_with_writer(level, writer),
        None => {
            init_with_writer(Level::INFO, writer);
            warn!("Unknown log level '{}', using info", level);
        }
    }
}

/// Initialize the tracing subscriber with a level and an explicit writer.
///
/// `RUST_LOG` directives are honoured on top of the `coachreserve=<level>`
/// default. Uses `try_init`, so a second call (e.g. from tests) is a no-op.
pub fn init_with_writer<W>(level: Level, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    // Targets match by prefix, so this covers every coachreserve_* crate.
    let mut filter = EnvFilter::from_default_env();
    match format!("coachreserve={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("invalid log directive: {}", e),
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Parses a case-insensitive level name.
pub fn parse_level(level: &str) -> Option<Level> {
    Level::from_str(level.trim()).ok()
}

/// Log a result, with different messages for success and error cases.
///
/// # Returns
///
/// The original result, allowing this function to be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
