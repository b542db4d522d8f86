//! HTTP client initialization.
//!
//! This module provides the function to initialize the HTTP client shared by
//! the IP geolocation providers and the technology page fetcher.

use std::sync::Arc;

use crate::config::{Config, MAX_REDIRECT_HOPS};
use reqwest::ClientBuilder;

/// Initializes the HTTP client with default settings.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Per-request timeout from the configuration
/// - Redirect following enabled (up to 10 hops)
/// - Rustls TLS backend (no native TLS)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(config.call_timeout())
        .connect_timeout(config.call_timeout())
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_from_default_config() {
        assert!(init_client(&Config::default()).is_ok());
    }
}
