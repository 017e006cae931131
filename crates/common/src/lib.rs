//! GazeLens Common Utilities
//!
//! Shared infrastructure for all GazeLens crates:
//! - Error types and result aliases
//! - Monotonic clock for sample timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
