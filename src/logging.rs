//! Tracing subscriber setup for the `tunroute` binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "tunroute=info";

/// Installs a global fmt subscriber writing to stderr, filtered by
/// `RUST_LOG`. Repeated calls leave the first subscriber in place.
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();
}
