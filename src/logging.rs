//! Tracing subscriber setup for the command-line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a stderr fmt subscriber.
///
/// Reads the `OSTINATO_LOG` environment variable (e.g. `OSTINATO_LOG=ostinato=debug`),
/// falling back to `ostinato=info`. Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("OSTINATO_LOG")
            .unwrap_or_else(|_| EnvFilter::new("ostinato=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
