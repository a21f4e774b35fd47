//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter directive used when `RUST_LOG` is not set.
///
/// `--verbose` raises the level to `debug`; otherwise the configured
/// level is used, falling back to `info` when it is blank.
pub fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    match config.level.trim() {
        "" => "info".to_string(),
        level => level.to_string(),
    }
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let fallback = default_directive(config, verbose);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();
}
