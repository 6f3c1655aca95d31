//! Diagnostic logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a full filter directive, e.g.
/// `RELEASE_GATE_LOG=release_gate::scanner=debug`
pub const LOG_ENV: &str = "RELEASE_GATE_LOG";

/// Install the global subscriber. Logs go to stderr so stdout stays usable
/// for reports. Calling it again is a no-op.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(filter)
        .try_init();
}

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (_, true) => "error",
        (true, false) => "release_gate=debug",
        (false, false) => "warn",
    }
}
