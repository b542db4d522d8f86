//! Per-domain enrichment.
//!
//! [`Enricher::enrich`] calls the sources in a fixed order and merges their
//! answers into one [`EnrichmentRecord`]:
//!
//! 1. WHOIS: registrar, creation date, secondary fields
//! 2. DNS: records, primary IP, CDN from NS/CNAME
//! 3. IP geolocation, only when DNS produced an IP and only after the
//!    shared limiter admits the call
//! 4. Technology: CMS, payment processors, web server, header CDN hint
//!
//! A failing source leaves its fields absent and adds a failure to the
//! record; enrichment itself never fails. Provider names (host, ISP, CDN,
//! registrar) are normalized before the record is returned.

mod lookup;
mod record;

use std::sync::Arc;

pub use lookup::{DnsLookup, IpLookup, TechLookup, WhoisLookup};
pub use record::EnrichmentRecord;

use crate::normalize::normalize_optional;
use crate::rate_limiter::FixedWindowLimiter;
use crate::tech::is_valid_cms;

/// Runs the enrichment sources for one domain at a time.
#[derive(Clone)]
pub struct Enricher {
    whois: Arc<dyn WhoisLookup>,
    dns: Arc<dyn DnsLookup>,
    ip: Arc<dyn IpLookup>,
    tech: Arc<dyn TechLookup>,
}

impl Enricher {
    pub fn new(
        whois: Arc<dyn WhoisLookup>,
        dns: Arc<dyn DnsLookup>,
        ip: Arc<dyn IpLookup>,
        tech: Arc<dyn TechLookup>,
    ) -> Self {
        Self {
            whois,
            dns,
            ip,
            tech,
        }
    }

    /// Enriches `domain`, which must already be normalized.
    pub async fn enrich(&self, domain: &str, limiter: &FixedWindowLimiter) -> EnrichmentRecord {
        let mut record = EnrichmentRecord::new(domain);

        log::debug!("WHOIS lookup for {}", domain);
        match self.whois.lookup_whois(domain).await {
            Ok(whois) => {
                record.registrar = normalize_optional(whois.registrar);
                record.creation_date = whois.creation_date;
                record.whois = whois.details;
            }
            Err(failure) => record.failures.push(failure),
        }

        log::debug!("DNS lookup for {}", domain);
        let dns = self.dns.resolve_dns(domain).await;
        record.dns_records = dns.records;
        record.ip_address = dns.ip_address;
        record.cdn = dns.cdn;
        record.failures.extend(dns.failures);

        if let Some(ip) = record.ip_address.clone() {
            let waited = limiter.acquire().await;
            if !waited.is_zero() {
                log::debug!("Waited {:?} for an IP lookup permit", waited);
            }
            log::debug!("IP lookup for {} ({})", domain, ip);
            match self.ip.lookup_ip(&ip).await {
                Ok(info) => {
                    record.host_name = normalize_optional(info.host_name);
                    record.isp = normalize_optional(info.isp);
                    record.asn = info.asn;
                    record.country = info.country;
                }
                Err(failure) => record.failures.push(failure),
            }
        } else {
            log::debug!("No A record for {}, skipping IP lookup", domain);
        }

        log::debug!("Technology detection for {}", domain);
        match self.tech.classify_tech(domain).await {
            Ok(tech) => {
                record.cms = tech.cms.filter(|cms| is_valid_cms(Some(cms)));
                record.payment_processors = tech
                    .payment_processors
                    .into_iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect();
                record.technologies = tech.technologies;
                record.web_server = tech.web_server;
                if record.cdn.is_none() {
                    record.cdn = tech.cdn;
                }
            }
            Err(failure) => record.failures.push(failure),
        }

        record.cdn = normalize_optional(record.cdn);

        if !record.failures.is_empty() {
            log::info!(
                "Enriched {} with {} failed lookup(s)",
                domain,
                record.failures.len()
            );
        }
        record
    }
}
