//! Log setup. Logs go to stderr so target output on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Filter override, e.g. `UVTASK_LOG=debug` or `UVTASK_LOG=uvtask=trace`
pub const LOG_ENV: &str = "UVTASK_LOG";

/// Install the global subscriber. `verbose` is the `-v` count and only
/// applies when `UVTASK_LOG` is unset.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
