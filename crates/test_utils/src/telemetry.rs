//! Tracing initialization for test runs

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok();
});

/// Initializes the tracing subscriber once per test binary
///
/// Safe to call from every test; only the first call does anything.
/// Set `RUST_LOG` to raise verbosity for a run.
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
