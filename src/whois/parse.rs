//! WHOIS data parsing and conversion.
//!
//! `whois-service` returns structured fields when its parser recognizes the
//! answer, plus the raw text. Structured fields win; the raw text fills the
//! gaps. WHOIS text is mostly `Key: Value` lines whose keys differ between
//! operators, so each field is matched against a list of known spellings
//! (case-insensitive).

use chrono::{DateTime, NaiveDate, Utc};
use whois_service::WhoisResponse;

use super::types::{WhoisDetails, WhoisInfo};

const REGISTRAR_KEYS: &[&str] = &["registrar", "registrar name", "sponsoring registrar"];

const CREATION_DATE_KEYS: &[&str] = &[
    "creation date",
    "created date",
    "created on",
    "created",
    "registered on",
    "registration date",
    "registration time",
    "domain registration date",
];

const EXPIRATION_DATE_KEYS: &[&str] = &[
    "registry expiry date",
    "registrar registration expiration date",
    "expiration date",
    "expiry date",
    "expires on",
    "expires",
    "paid-till",
];

const UPDATED_DATE_KEYS: &[&str] = &[
    "updated date",
    "last updated on",
    "last updated",
    "last modified",
    "last-modified",
    "changed",
];

const NAME_SERVER_KEYS: &[&str] = &["name server", "nameserver", "nserver"];

const STATUS_KEYS: &[&str] = &["domain status", "status"];

/// Splits WHOIS text into `(lower-cased key, value)` pairs.
///
/// Comment lines (`%`, `#`, `>>>`) and lines without a value are skipped.
pub(crate) fn split_fields(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('%') && !line.starts_with('#'))
        .filter(|line| !line.starts_with(">>>"))
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            Some((key.trim().to_lowercase(), value.to_string()))
        })
        .collect()
}

/// All values for any of `keys`, in source order.
fn values_for<'a>(fields: &'a [(String, String)], keys: &[&str]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(key, _)| keys.contains(&key.as_str()))
        .map(|(_, value)| value.as_str())
        .collect()
}

/// Parses the WHOIS responses of one lookup, registry answer first.
pub fn parse_whois(responses: &[String]) -> WhoisInfo {
    let fields: Vec<(String, String)> = responses.iter().flat_map(|r| split_fields(r)).collect();

    let registrar = values_for(&fields, REGISTRAR_KEYS)
        .into_iter()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string);

    let creation_candidates = values_for(&fields, CREATION_DATE_KEYS);
    let creation_date = first_date(&creation_candidates);

    let expiration_date = first_date(&values_for(&fields, EXPIRATION_DATE_KEYS))
        .map(|d| d.format("%Y-%m-%d").to_string());
    let updated_date = first_date(&values_for(&fields, UPDATED_DATE_KEYS))
        .map(|d| d.format("%Y-%m-%d").to_string());

    let mut name_servers: Vec<String> = Vec::new();
    for value in values_for(&fields, NAME_SERVER_KEYS) {
        // Some registries append glue addresses after the name
        let Some(name) = value.split_whitespace().next() else {
            continue;
        };
        let name = name.trim_end_matches('.').to_lowercase();
        if !name_servers.contains(&name) {
            name_servers.push(name);
        }
    }

    let mut status: Vec<String> = Vec::new();
    for value in values_for(&fields, STATUS_KEYS) {
        // "clientTransferProhibited https://icann.org/epp#clientTransferProhibited"
        let Some(code) = value.split_whitespace().next() else {
            continue;
        };
        if !status.iter().any(|s| s == code) {
            status.push(code.to_string());
        }
    }

    WhoisInfo {
        registrar,
        creation_date,
        details: WhoisDetails {
            expiration_date,
            updated_date,
            name_servers,
            status,
        },
    }
}

/// Converts a whois-service response to our `WhoisInfo`.
pub(crate) fn convert_response(response: &WhoisResponse) -> WhoisInfo {
    let from_raw = parse_whois(std::slice::from_ref(&response.raw_data));
    let Some(parsed) = &response.parsed_data else {
        return from_raw;
    };

    let registrar = parsed
        .registrar
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .or(from_raw.registrar);

    let creation_date = parsed
        .creation_date
        .as_deref()
        .and_then(|d| first_date(&[d]))
        .or(from_raw.creation_date);

    let day = |value: &Option<String>| {
        value
            .as_deref()
            .and_then(|d| first_date(&[d]))
            .map(|d| d.format("%Y-%m-%d").to_string())
    };

    let mut name_servers: Vec<String> = Vec::new();
    for ns in &parsed.name_servers {
        let ns = ns.trim().trim_end_matches('.').to_lowercase();
        if !ns.is_empty() && !name_servers.contains(&ns) {
            name_servers.push(ns);
        }
    }

    let mut status: Vec<String> = Vec::new();
    for value in &parsed.status {
        if let Some(code) = value.split_whitespace().next() {
            if !status.iter().any(|s| s == code) {
                status.push(code.to_string());
            }
        }
    }

    let details = WhoisDetails {
        expiration_date: day(&parsed.expiration_date).or(from_raw.details.expiration_date),
        updated_date: day(&parsed.updated_date).or(from_raw.details.updated_date),
        name_servers: if name_servers.is_empty() {
            from_raw.details.name_servers
        } else {
            name_servers
        },
        status: if status.is_empty() {
            from_raw.details.status
        } else {
            status
        },
    };

    WhoisInfo {
        registrar,
        creation_date,
        details,
    }
}

/// Picks the authoritative date from a sequence of candidates.
///
/// The earliest-ordered element that parses wins; date-times are truncated to
/// their calendar date. Unparseable candidates are skipped, and no parseable
/// candidate yields `None`.
pub fn first_date(candidates: &[&str]) -> Option<NaiveDate> {
    candidates
        .iter()
        .find_map(|candidate| parse_date_string(candidate.trim()))
        .map(|dt| dt.date_naive())
}

/// Attempts to parse a date string in various formats
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common WHOIS date formats
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%Y.%m.%d",
        "%Y/%m/%d",
        "%d-%b-%Y",
        "%d/%m/%Y",
        "%d.%m.%Y",
    ];

    for format in &formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive_dt) = chrono::NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive_dt.and_utc());
        }
        if let Ok(naive_date) = NaiveDate::parse_from_str(date_str, format) {
            return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
