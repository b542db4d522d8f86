//! Error type definitions.
//!
//! This module defines the error types used throughout the application and the
//! typed failure carried by every resolver result.

use std::fmt;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A JSON column could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The lookup source a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum LookupSource {
    Whois,
    DnsA,
    DnsAaaa,
    DnsMx,
    DnsNs,
    DnsCname,
    Ip,
    Technology,
}

impl LookupSource {
    /// Returns a human-readable string representation of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Whois => "WHOIS",
            LookupSource::DnsA => "DNS A",
            LookupSource::DnsAaaa => "DNS AAAA",
            LookupSource::DnsMx => "DNS MX",
            LookupSource::DnsNs => "DNS NS",
            LookupSource::DnsCname => "DNS CNAME",
            LookupSource::Ip => "IP geolocation",
            LookupSource::Technology => "Technology detection",
        }
    }
}

/// Why a lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureReason {
    /// The call exceeded its timeout
    Timeout,
    /// Connection refused, reset, DNS failure of the endpoint, TLS error
    Network,
    /// Upstream answered 429 or reported an exhausted quota
    Quota,
    /// Upstream answered with a non-success status
    UpstreamStatus,
    /// Upstream answered but the payload could not be understood
    Malformed,
    /// No server or record exists for the query
    NotFound,
    /// Anything else
    Other,
}

impl FailureReason {
    /// Returns a short reason code for logs and statistics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::Network => "network",
            FailureReason::Quota => "quota",
            FailureReason::UpstreamStatus => "upstream_status",
            FailureReason::Malformed => "malformed",
            FailureReason::NotFound => "not_found",
            FailureReason::Other => "other",
        }
    }
}

/// A resolver-level failure.
///
/// The orchestrator treats any failure as "fields absent"; the failure itself
/// is kept on the record for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub source: LookupSource,
    pub reason: FailureReason,
    pub message: String,
}

impl LookupFailure {
    pub fn new(source: LookupSource, reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            source,
            reason,
            message: message.into(),
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lookup failed ({}): {}",
            self.source.as_str(),
            self.reason.as_str(),
            self.message
        )
    }
}

impl std::error::Error for LookupFailure {}

/// Result of a single resolver call.
pub type LookupOutcome<T> = Result<T, LookupFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_source_has_a_label() {
        for source in LookupSource::iter() {
            assert!(!source.as_str().is_empty());
        }
    }

    #[test]
    fn test_reason_codes_are_unique() {
        let codes: std::collections::HashSet<_> =
            FailureReason::iter().map(|r| r.as_str()).collect();
        assert_eq!(codes.len(), FailureReason::iter().count());
    }

    #[test]
    fn test_lookup_failure_display() {
        let failure = LookupFailure::new(LookupSource::Whois, FailureReason::Timeout, "no answer");
        assert_eq!(
            failure.to_string(),
            "WHOIS lookup failed (timeout): no answer"
        );
    }
}
