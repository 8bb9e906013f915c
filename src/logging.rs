//! Process-wide tracing subscriber.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber.
///
/// `RUST_LOG` wins when set (`RUST_LOG=pinax=debug`); otherwise
/// `default_level` applies to everything. Calling this twice is harmless:
/// the second call leaves the first subscriber in place.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
