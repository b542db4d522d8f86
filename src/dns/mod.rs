//! DNS resolution and CDN inference.
//!
//! This module queries the record sets the enrichment pipeline needs using
//! `hickory-resolver`:
//! - Address records (A/AAAA), the first A record becomes the primary IP
//! - Mail exchangers (MX)
//! - Nameservers (NS) and aliases (CNAME), which also feed the CDN heuristic
//!
//! Each record type is resolved independently. A failure on one type never
//! aborts the others; it leaves an empty entry and a recorded failure.

mod cdn;
mod records;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error_handling::{categorize_dns_error, LookupFailure, LookupSource};

// Re-export public API
pub use cdn::{detect_cdn, CDN_INDICATORS};
pub use records::{is_no_records, lookup_records};

/// The record types collected for every domain.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize, Deserialize,
)]
pub enum DnsRecordType {
    A,
    AAAA,
    MX,
    NS,
    CNAME,
}

impl DnsRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::AAAA => "AAAA",
            DnsRecordType::MX => "MX",
            DnsRecordType::NS => "NS",
            DnsRecordType::CNAME => "CNAME",
        }
    }

    fn lookup_source(&self) -> LookupSource {
        match self {
            DnsRecordType::A => LookupSource::DnsA,
            DnsRecordType::AAAA => LookupSource::DnsAaaa,
            DnsRecordType::MX => LookupSource::DnsMx,
            DnsRecordType::NS => LookupSource::DnsNs,
            DnsRecordType::CNAME => LookupSource::DnsCname,
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record type -> textual values, with every type present.
pub type DnsRecords = BTreeMap<DnsRecordType, Vec<String>>;

/// Returns a record map with an empty entry for every record type.
pub fn empty_records() -> DnsRecords {
    DnsRecordType::iter().map(|t| (t, Vec::new())).collect()
}

/// Everything the DNS resolver contributes to an enrichment record.
#[derive(Debug, Clone, PartialEq)]
pub struct DnsInfo {
    pub records: DnsRecords,
    pub ip_address: Option<String>,
    pub cdn: Option<String>,
    pub failures: Vec<LookupFailure>,
}

impl Default for DnsInfo {
    fn default() -> Self {
        Self {
            records: empty_records(),
            ip_address: None,
            cdn: None,
            failures: Vec::new(),
        }
    }
}

impl DnsInfo {
    /// Builds the derived fields (primary IP, CDN guess) from resolved records.
    pub fn from_records(records: DnsRecords, failures: Vec<LookupFailure>) -> Self {
        let ip_address = records
            .get(&DnsRecordType::A)
            .and_then(|a| a.first())
            .cloned();
        let no_values = Vec::new();
        let cdn = detect_cdn(
            records.get(&DnsRecordType::NS).unwrap_or(&no_values),
            records.get(&DnsRecordType::CNAME).unwrap_or(&no_values),
        )
        .map(str::to_string);

        Self {
            records,
            ip_address,
            cdn,
            failures,
        }
    }
}

/// DNS resolver backed by a shared hickory resolver.
#[derive(Clone)]
pub struct DnsResolver {
    resolver: Arc<TokioAsyncResolver>,
}

impl DnsResolver {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }

    /// Resolves every record type for `domain`.
    ///
    /// Never fails: per-type errors are logged, recorded in
    /// [`DnsInfo::failures`] and leave that type's entry empty.
    pub async fn resolve(&self, domain: &str) -> DnsInfo {
        let mut records = empty_records();
        let mut failures = Vec::new();

        for record_type in DnsRecordType::iter() {
            match lookup_records(domain, record_type, &self.resolver).await {
                Ok(values) => {
                    records.insert(record_type, values);
                }
                Err(e) => {
                    log::warn!("{record_type} lookup failed for {domain}: {e}");
                    failures.push(LookupFailure::new(
                        record_type.lookup_source(),
                        categorize_dns_error(&e),
                        e.to_string(),
                    ));
                }
            }
        }

        DnsInfo::from_records(records, failures)
    }
}
