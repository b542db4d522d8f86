//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, pacing, limits)
//! - HTTP header name constants used by technology detection
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel};
