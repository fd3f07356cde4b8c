//! Tracing setup: structured logging with span definitions and event helpers.

pub mod events;
pub mod spans;

use neuropilot_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter before the configured level.
pub const LOG_ENV_VAR: &str = "NEUROPILOT_LOG";

/// Initialize the global tracing subscriber.
///
/// Respects `NEUROPILOT_LOG` for filtering and falls back to the configured
/// log level. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_logs {
        builder
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
    } else {
        builder.try_init()
    };
    // A subscriber set earlier (tests, embedding hosts) wins.
    let _ = result;
}
