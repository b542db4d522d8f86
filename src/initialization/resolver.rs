//! DNS resolver initialization.
//!
//! This module provides the function to initialize the DNS resolver with
//! proper timeout configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};
use crate::error_handling::InitializationError;
use hickory_resolver::TokioAsyncResolver;

/// Initializes the DNS resolver for record lookups.
///
/// Creates a DNS resolver using the default upstream configuration with
/// short per-attempt timeouts, so a slow nameserver costs one record type
/// rather than the whole domain.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver cannot be
/// constructed.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    // Input domains are fully qualified; never append search domains
    opts.ndots = 0;

    Ok(Arc::new(TokioAsyncResolver::tokio(
        ResolverConfig::default(),
        opts,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver() {
        assert!(init_resolver().is_ok());
    }
}
