//! Diagnostic logging setup.
//!
//! Library crates emit `tracing` events; binaries call [`init`] once to send
//! them to stderr.

use stitch_foundation::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "STITCH_LOG";

/// Builds the log filter: `level` if given, else [`LOG_ENV`], else `warn`.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid.
pub fn filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| Error::invalid_argument(format!("invalid log level '{level}': {e}"))),
        None => Ok(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))),
    }
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(level: Option<&str>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::internal(format!("failed to install logger: {e}")))
}
