//! IP geolocation and hosting lookup.
//!
//! Resolves country, ISP, hosting organization and ASN for the domain's
//! primary IPv4 address. ip-api.com is the default provider; when an IPLocate
//! API key is configured IPLocate answers first and ip-api.com fills whatever
//! it left empty.

mod providers;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use providers::parse_asn;
use providers::{IpApiResponse, IpLocateResponse};

use crate::config::{IPLOCATE_BASE_URL, IP_API_BASE_URL};
use crate::error_handling::{
    categorize_reqwest_error, FailureReason, LookupFailure, LookupOutcome, LookupSource,
};

/// Hosting facts for one IP address. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInfo {
    pub country: Option<String>,
    pub isp: Option<String>,
    pub host_name: Option<String>,
    /// AS number without the `AS` prefix
    pub asn: Option<String>,
}

impl IpInfo {
    /// Fills every absent field from `other`.
    pub fn fill_from(&mut self, other: IpInfo) {
        if self.country.is_none() {
            self.country = other.country;
        }
        if self.isp.is_none() {
            self.isp = other.isp;
        }
        if self.host_name.is_none() {
            self.host_name = other.host_name;
        }
        if self.asn.is_none() {
            self.asn = other.asn;
        }
    }

    fn is_complete(&self) -> bool {
        self.country.is_some() && self.isp.is_some() && self.host_name.is_some() && self.asn.is_some()
    }
}

fn ip_failure(reason: FailureReason, message: impl Into<String>) -> LookupFailure {
    LookupFailure::new(LookupSource::Ip, reason, message)
}

/// Looks up hosting details for IP addresses over HTTP.
#[derive(Debug, Clone)]
pub struct IpResolver {
    client: Arc<reqwest::Client>,
    ip_api_base: String,
    iplocate_base: String,
    iplocate_api_key: Option<String>,
}

impl IpResolver {
    pub fn new(client: Arc<reqwest::Client>, iplocate_api_key: Option<String>) -> Self {
        Self {
            client,
            ip_api_base: IP_API_BASE_URL.to_string(),
            iplocate_base: IPLOCATE_BASE_URL.to_string(),
            iplocate_api_key: iplocate_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Points the providers at other base URLs (mock servers in tests).
    pub fn with_base_urls(
        mut self,
        ip_api_base: impl Into<String>,
        iplocate_base: impl Into<String>,
    ) -> Self {
        self.ip_api_base = ip_api_base.into();
        self.iplocate_base = iplocate_base.into();
        self
    }

    /// Looks up `ip`.
    ///
    /// With an IPLocate key, an IPLocate failure is only logged and ip-api.com
    /// is asked instead; the lookup fails only when no provider answered.
    pub async fn lookup(&self, ip: &str) -> LookupOutcome<IpInfo> {
        let mut info = None;

        if let Some(key) = &self.iplocate_api_key {
            match self.query_iplocate(ip, key).await {
                Ok(found) if found.is_complete() => return Ok(found),
                Ok(found) => info = Some(found),
                Err(e) => log::warn!("IPLocate lookup failed for {}: {}", ip, e),
            }
        }

        match self.query_ip_api(ip).await {
            Ok(fallback) => {
                let mut merged = info.unwrap_or_default();
                merged.fill_from(fallback);
                Ok(merged)
            }
            Err(e) => match info {
                Some(partial) => {
                    log::debug!("ip-api.com could not complete {}: {}", ip, e);
                    Ok(partial)
                }
                None => {
                    log::warn!("IP lookup failed for {}: {}", ip, e);
                    Err(e)
                }
            },
        }
    }

    async fn query_ip_api(&self, ip: &str) -> LookupOutcome<IpInfo> {
        let url = format!("{}/json/{}", self.ip_api_base.trim_end_matches('/'), ip);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ip_failure(categorize_reqwest_error(&e), format!("ip-api.com: {e}")))?;

        let parsed: IpApiResponse = response.json().await.map_err(|e| {
            ip_failure(FailureReason::Malformed, format!("ip-api.com: {e}"))
        })?;

        if !parsed.is_success() {
            let message = parsed.message.unwrap_or_else(|| "status not success".into());
            // "quota" or "private range" come back with HTTP 200
            let reason = if message.to_lowercase().contains("quota") {
                FailureReason::Quota
            } else {
                FailureReason::UpstreamStatus
            };
            return Err(ip_failure(reason, format!("ip-api.com: {message}")));
        }

        Ok(parsed.into_info())
    }

    async fn query_iplocate(&self, ip: &str, key: &str) -> LookupOutcome<IpInfo> {
        let url = format!(
            "{}/api/lookup/{}",
            self.iplocate_base.trim_end_matches('/'),
            ip
        );
        let response = self
            .client
            .get(&url)
            .query(&[("apikey", key)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ip_failure(categorize_reqwest_error(&e), format!("IPLocate: {e}")))?;

        let parsed: IpLocateResponse = response
            .json()
            .await
            .map_err(|e| ip_failure(FailureReason::Malformed, format!("IPLocate: {e}")))?;
        Ok(parsed.into_info())
    }
}
