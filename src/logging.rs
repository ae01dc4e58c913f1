//! Tracing initialization for the binaries
//!
//! `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=poste_analyzer=debug`.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, falling back to `default_filter`.
///
/// Output goes to stderr so CLI results on stdout stay machine-readable.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests, embedding)
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
