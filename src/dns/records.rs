//! DNS record queries (A, AAAA, MX, NS, CNAME).
//!
//! Every query returns the textual form of each record:
//! - A/AAAA: the address
//! - MX: `"<preference> <exchange>"`, sorted by preference
//! - NS/CNAME: the target name

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

use super::DnsRecordType;

/// Returns true when the error means "the name has no records of this type".
///
/// NXDOMAIN and empty answers are expected for many domains and are reported
/// as an empty result rather than a failure.
pub fn is_no_records(error: &ResolveError) -> bool {
    matches!(error.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// Queries one record type for a domain.
///
/// # Arguments
///
/// * `domain` - The domain to query
/// * `record_type` - Which record set to fetch
/// * `resolver` - The DNS resolver instance
///
/// # Returns
///
/// The textual record values, or an empty vector if the name has no records
/// of this type.
///
/// # Errors
///
/// Timeouts and transport failures are returned as errors so the caller can
/// record them.
pub async fn lookup_records(
    domain: &str,
    record_type: DnsRecordType,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, ResolveError> {
    let wire_type = match record_type {
        DnsRecordType::A => RecordType::A,
        DnsRecordType::AAAA => RecordType::AAAA,
        DnsRecordType::MX => RecordType::MX,
        DnsRecordType::NS => RecordType::NS,
        DnsRecordType::CNAME => RecordType::CNAME,
    };

    let lookup = match resolver.lookup(domain, wire_type).await {
        Ok(lookup) => lookup,
        Err(e) if is_no_records(&e) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    // The answer can carry the CNAME chain alongside the requested records,
    // so keep only data of the requested type.
    let values = match record_type {
        DnsRecordType::A => lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::A(a) => Some(a.0.to_string()),
                _ => None,
            })
            .collect(),
        DnsRecordType::AAAA => lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::AAAA(aaaa) => Some(aaaa.0.to_string()),
                _ => None,
            })
            .collect(),
        DnsRecordType::MX => {
            let mut mx: Vec<(u16, String)> = lookup
                .iter()
                .filter_map(|rdata| match rdata {
                    RData::MX(mx) => Some((mx.preference(), mx.exchange().to_utf8())),
                    _ => None,
                })
                .collect();
            // Lower preference = higher priority
            mx.sort_by_key(|(preference, _)| *preference);
            mx.into_iter()
                .map(|(preference, exchange)| format!("{preference} {exchange}"))
                .collect()
        }
        DnsRecordType::NS => lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::NS(ns) => Some(ns.0.to_utf8()),
                _ => None,
            })
            .collect(),
        DnsRecordType::CNAME => lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::CNAME(cname) => Some(cname.0.to_utf8()),
                _ => None,
            })
            .collect(),
    };

    Ok(values)
}
