//! Tracing initialization.
//!
//! Silent by default so that stderr carries only the launcher's diagnostic.
//! Set `HELIUM_LAUNCHER_LOG` (an `EnvFilter` directive, e.g. `debug`) to see
//! per-token decisions.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "HELIUM_LAUNCHER_LOG";

/// Initialize tracing. Call at process startup.
///
/// Logging only observes decisions; it never changes them.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
}
