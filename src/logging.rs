//! # Logging
//!
//! Installs the `tracing` subscriber for the binary. Output goes to stderr
//! and the level comes from the `[logging]` config section.

use tracing_subscriber::EnvFilter;

/// Initialise logging. Without debug the level is pinned to `info`; with
/// debug enabled `RUST_LOG` may override the default `debug` level.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so the ASCII and JSON previews stay clean on stdout.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
