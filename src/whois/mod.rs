//! WHOIS/RDAP domain lookup using the whois-service crate.
//!
//! Registrar and creation date come from whichever of RDAP or WHOIS answers
//! first. A failed lookup is reported as a `LookupFailure` and never aborts
//! enrichment of the domain.

mod parse;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use whois_service::{Config as WhoisConfig, LookupStatus, WhoisClient, WhoisError, WhoisResponse};

pub use parse::{first_date, parse_whois};
pub use types::{WhoisDetails, WhoisInfo};

use crate::config::{WHOIS_MAX_REFERRAL_DEPTH, WHOIS_MAX_RESPONSE_SIZE};
use crate::error_handling::{
    categorize_whois_error, FailureReason, LookupFailure, LookupOutcome, LookupSource,
};

/// Resolves registrar, creation date and secondary WHOIS fields for a domain.
///
/// The underlying client is built on first use and shared by later lookups.
pub struct WhoisResolver {
    timeout: Duration,
    client: OnceCell<WhoisClient>,
}

impl WhoisResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&WhoisClient, WhoisError> {
        self.client
            .get_or_try_init(|| async {
                let mut config = WhoisConfig::load()?;
                config.whois_timeout_seconds = self.timeout.as_secs().max(1);
                config.max_referrals = WHOIS_MAX_REFERRAL_DEPTH;
                config.max_response_size = WHOIS_MAX_RESPONSE_SIZE;
                WhoisClient::new_with_config(Arc::new(config)).await
            })
            .await
    }

    /// Performs a WHOIS lookup for a domain.
    ///
    /// A server that answers without any recognizable field still yields
    /// `Ok` with every field absent.
    pub async fn lookup(&self, domain: &str) -> LookupOutcome<WhoisInfo> {
        log::debug!("Starting WHOIS lookup for domain: {}", domain);

        let client = self.client().await.map_err(|e| {
            log::warn!("Failed to create WHOIS client: {}", e);
            whois_failure(&e)
        })?;

        // The crate's own timeout is per server; bound the whole lookup too
        let response = match tokio::time::timeout(self.timeout, client.lookup_fresh(domain)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                log::warn!("WHOIS lookup failed for {}: {}", domain, e);
                return Err(whois_failure(&e));
            }
            Err(_) => {
                log::warn!("WHOIS lookup timed out for {}", domain);
                return Err(LookupFailure::new(
                    LookupSource::Whois,
                    FailureReason::Timeout,
                    format!("no answer within {}s", self.timeout.as_secs()),
                ));
            }
        };

        let info = convert_lookup(&response)?;
        if info.creation_date.is_none() {
            log::debug!("No parseable creation date in WHOIS for {}", domain);
        }
        Ok(info)
    }
}

/// Classifies a whois-service response before field conversion.
///
/// A rate-limited answer carries no usable data; an unregistered domain is a
/// successful lookup with every field absent.
fn convert_lookup(response: &WhoisResponse) -> LookupOutcome<WhoisInfo> {
    match response.lookup_status {
        LookupStatus::RateLimited => Err(LookupFailure::new(
            LookupSource::Whois,
            FailureReason::Quota,
            format!("rate limited by {}", response.whois_server),
        )),
        LookupStatus::NotFound => Ok(WhoisInfo::default()),
        LookupStatus::Found => Ok(parse::convert_response(response)),
    }
}

fn whois_failure(error: &WhoisError) -> LookupFailure {
    LookupFailure::new(
        LookupSource::Whois,
        categorize_whois_error(error),
        error.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn response(status: LookupStatus, raw: &str) -> WhoisResponse {
        WhoisResponse {
            domain: "example.com".to_string(),
            whois_server: "WHOIS: whois.verisign-grs.com".to_string(),
            raw_data: raw.to_string(),
            parsed_data: None,
            lookup_status: status,
            cached: false,
            query_time_ms: 40,
            parsing_analysis: None,
        }
    }

    #[test]
    fn test_convert_lookup_found() {
        let raw = "Registrar: NameCheap, Inc.\r\nCreation Date: 2012-03-04T05:06:07Z\r\n";
        let info = convert_lookup(&response(LookupStatus::Found, raw)).unwrap();
        assert_eq!(info.registrar.as_deref(), Some("NameCheap, Inc."));
        assert_eq!(info.creation_date, NaiveDate::from_ymd_opt(2012, 3, 4));
    }

    #[test]
    fn test_convert_lookup_not_found_is_empty_success() {
        let raw = "No match for \"NOPE-12345.COM\".";
        let info = convert_lookup(&response(LookupStatus::NotFound, raw)).unwrap();
        assert_eq!(info, WhoisInfo::default());
    }

    #[test]
    fn test_convert_lookup_rate_limited_is_quota_failure() {
        let raw = "Registrar: Stale Data Inc.\n";
        let failure = convert_lookup(&response(LookupStatus::RateLimited, raw)).unwrap_err();
        assert_eq!(failure.source, LookupSource::Whois);
        assert_eq!(failure.reason, FailureReason::Quota);
    }

    #[test]
    fn test_whois_failure_keeps_message() {
        let failure = whois_failure(&WhoisError::UnsupportedTld("zz".to_string()));
        assert_eq!(failure.reason, FailureReason::NotFound);
        assert!(failure.message.contains("zz"));
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_whois_lookup_real_domain() {
        let resolver = WhoisResolver::new(Duration::from_secs(15));
        let info = resolver.lookup("example.com").await.unwrap();
        assert!(info.creation_date.is_some());
    }
}
