//! Logging setup for the kensa tools using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. the `verbose` flag passed by the tool (`debug`)
//! 2. the `KENSA_LOG` environment variable (any `EnvFilter` directive)
//! 3. default to `warn`
//!
//! Logs go to stderr so that stdout stays clean for reports and generated JSON.

use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV_VAR: &str = "KENSA_LOG";

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Ignore a second initialisation instead of panicking.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
