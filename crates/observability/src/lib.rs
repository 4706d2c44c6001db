//! Process-wide logging setup shared by binaries and tests that embed the engine.
//!
//! The engine crates only emit `tracing` events; nothing is printed until one of
//! these initializers installs a subscriber.

pub mod tracing;

pub use crate::tracing::LogConfig;

/// JSON logs filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init_with(&LogConfig::default());
}

/// Like [`init`], with explicit output format and fallback filter.
pub fn init_with(config: &LogConfig) {
    tracing::init_with(config);
}
