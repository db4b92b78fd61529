//! Logging configuration and initialization.
//!
//! Logs go to stderr so stdout carries only the LaTeX table.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2) // Show target module for -vv and above
        .with_line_number(verbose >= 3) // Show line numbers for -vvv
        .try_init();

    debug!("ness started with verbosity level: {verbose}");
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
