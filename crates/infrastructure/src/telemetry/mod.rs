//! Telemetry setup
//!
//! Structured logging via `tracing`, filtered by `RUST_LOG` when set,
//! otherwise by the requested verbosity.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_telemetry(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
