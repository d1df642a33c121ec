//! Tracing setup for the `vayu` binary.
//!
//! Refresh failures and skipped CSV rows are reported through `tracing`.
//! Everything goes to stderr: stdout carries the rendered dashboard or the
//! `--json` stream, and `watch --json` consumers read it line by line.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber for a CLI run. `--verbose` lowers the default
/// level to debug so each fetch URL and skipped row is shown; `RUST_LOG`
/// overrides either default.
pub fn init_for_verbosity(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Route logs through the test harness so failures show fetch and parse
/// warnings next to the assertion.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
