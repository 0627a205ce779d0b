//! Tracing subscriber setup.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber once.
///
/// `RUST_LOG` wins; otherwise `debug` for this crate in debug builds and
/// `info` in release builds. Later calls are no-ops.
pub fn init() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                EnvFilter::new("info,desktop_volume_mixer=debug")
            } else {
                EnvFilter::new("info")
            }
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .ok();
    });
}
