//! Tracing subscriber setup for the `moodpaper` binary

use tracing_subscriber::EnvFilter;

/// Default level when `--log-level` is not given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` wins, otherwise `moodpaper=<level>,warn`
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("moodpaper={log_level},warn")))
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing(log_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
