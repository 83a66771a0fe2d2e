//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the polyglot tracing/logging system.
///
/// Reads `POLYGLOT_LOG` for per-subsystem log levels, e.g.
/// `POLYGLOT_LOG=polyglot_analysis::cache=debug,polyglot_analysis=info`.
///
/// Falls back to `polyglot=info` if `POLYGLOT_LOG` is not set or is invalid.
/// Idempotent: calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("POLYGLOT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("polyglot=info"));

        // try_init: an embedder may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
