//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout stays parseable for `--json` output. The
//! filter comes from `OXIDIR_LOG` when set; otherwise `-v` raises the
//! engine crates to debug and `-vv` raises everything to trace.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "OXIDIR_LOG";

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info,oxidir_engine=debug,oxidir_cli=debug"),
        _ => EnvFilter::new("trace"),
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init();
}
