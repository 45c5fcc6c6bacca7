//! # Userdir Observe
//!
//! Observability initialization for the userdir service.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Initialize observability with defaults.
///
/// Convenience entry point for the server binary; honors `RUST_LOG` when
/// set.
pub fn init() -> anyhow::Result<()> {
    logging::init_logging(LogConfig::default())
}
