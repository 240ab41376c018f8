//! Diagnostic logging
//!
//! Operator-facing output goes through [`crate::ui::ProgressReporter`]. This
//! module only wires up `tracing` for debugging: external commands and file
//! mutations are traced at `debug`, and the filter is read from
//! `TEMPLATE_SYNC_LOG` (e.g. `TEMPLATE_SYNC_LOG=debug`).

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "TEMPLATE_SYNC_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Initialize the global subscriber. Logs go to stderr so they never mix
/// with the reconciliation report on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // A second init (tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
