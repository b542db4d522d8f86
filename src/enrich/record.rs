//! The merged per-domain record.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dns::{empty_records, DnsRecordType, DnsRecords};
use crate::error_handling::LookupFailure;
use crate::whois::WhoisDetails;

/// Everything learned about one domain in one run.
///
/// Built fresh for every enrichment and never merged with earlier runs.
/// Each field has exactly one source, so merging is a disjoint union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentRecord {
    pub domain: String,
    /// First A record
    pub ip_address: Option<String>,
    /// Every collected record type, empty when nothing resolved
    pub dns_records: DnsRecords,
    pub host_name: Option<String>,
    pub isp: Option<String>,
    pub asn: Option<String>,
    pub country: Option<String>,
    pub cdn: Option<String>,
    pub cms: Option<String>,
    pub registrar: Option<String>,
    pub creation_date: Option<NaiveDate>,
    pub payment_processors: Vec<String>,
    pub whois: WhoisDetails,
    pub web_server: Option<String>,
    pub technologies: Vec<String>,
    /// Resolver failures, for logs and statistics only
    #[serde(skip)]
    pub failures: Vec<LookupFailure>,
}

impl EnrichmentRecord {
    /// An empty record for `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ip_address: None,
            dns_records: empty_records(),
            host_name: None,
            isp: None,
            asn: None,
            country: None,
            cdn: None,
            cms: None,
            registrar: None,
            creation_date: None,
            payment_processors: Vec::new(),
            whois: WhoisDetails::default(),
            web_server: None,
            technologies: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn records(&self, record_type: DnsRecordType) -> &[String] {
        self.dns_records
            .get(&record_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
