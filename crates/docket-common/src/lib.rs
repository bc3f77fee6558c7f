//! Docket Common
//!
//! Shared pieces for the docket binaries:
//! - Environment-driven configuration
//! - Tracing subscriber setup

pub mod config;
pub mod logging;

pub use config::{ConfigError, DocketConfig, StorageBackend};
pub use logging::init_tracing;
