//! Logger initialization.
//!
//! Everything in the workspace logs through the `log` facade; this module
//! wires up `env_logger` as the backend.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the global logger, filtered by `RUST_LOG` (e.g.
/// "coreglut=debug,spinning_cube=trace") and falling back to `info`.
/// Later calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
