//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger
//! - HTTP client (timeouts, redirect limit, user agent)
//! - DNS resolver
//! - IP lookup rate limiter
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod rate_limiter;
mod resolver;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
pub use rate_limiter::init_rate_limiter;
pub use resolver::init_resolver;
