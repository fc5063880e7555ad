//! Telemetry logic.
//! Structured logging via `tracing`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "tracka=info,tower_http=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with(fmt::layer())
        .init();
}
