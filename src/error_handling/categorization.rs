//! Error categorization.
//!
//! Maps transport errors from the HTTP client, the DNS resolver and the WHOIS
//! client onto the small set of `FailureReason`s used for statistics and logs.

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use whois_service::WhoisError;

use super::types::FailureReason;

/// Categorizes a `reqwest::Error` into a `FailureReason`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FailureReason {
    if let Some(status) = error.status() {
        return match status.as_u16() {
            429 => FailureReason::Quota,
            404 => FailureReason::NotFound,
            _ => FailureReason::UpstreamStatus,
        };
    }

    if error.is_timeout() {
        FailureReason::Timeout
    } else if error.is_connect() || error.is_request() || error.is_redirect() {
        FailureReason::Network
    } else if error.is_decode() || error.is_body() {
        FailureReason::Malformed
    } else {
        FailureReason::Other
    }
}

/// Categorizes a hickory `ResolveError` into a `FailureReason`.
///
/// "No records" answers are not failures for the DNS resolver; callers check
/// [`is_no_records`](crate::dns) before reaching this.
pub fn categorize_dns_error(error: &ResolveError) -> FailureReason {
    match error.kind() {
        ResolveErrorKind::Timeout => FailureReason::Timeout,
        ResolveErrorKind::NoRecordsFound { .. } => FailureReason::NotFound,
        ResolveErrorKind::Io(_) | ResolveErrorKind::Proto(_) => FailureReason::Network,
        _ => FailureReason::Other,
    }
}

/// Categorizes a socket error into a `FailureReason`.
pub fn categorize_io_error(error: &std::io::Error) -> FailureReason {
    use std::io::ErrorKind;
    match error.kind() {
        ErrorKind::TimedOut => FailureReason::Timeout,
        ErrorKind::NotFound => FailureReason::NotFound,
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => FailureReason::Malformed,
        _ => FailureReason::Network,
    }
}

/// Categorizes a `whois_service::WhoisError` into a `FailureReason`.
pub fn categorize_whois_error(error: &WhoisError) -> FailureReason {
    match error {
        WhoisError::Timeout => FailureReason::Timeout,
        WhoisError::RateLimited(_) => FailureReason::Quota,
        WhoisError::IoError(e) => categorize_io_error(e),
        WhoisError::HttpError(e) => categorize_reqwest_error(e),
        WhoisError::ResponseTooLarge | WhoisError::InvalidUtf8 => FailureReason::Malformed,
        WhoisError::InvalidDomain(_) | WhoisError::UnsupportedTld(_) => FailureReason::NotFound,
        _ => FailureReason::Other,
    }
}
