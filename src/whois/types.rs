//! WHOIS data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the WHOIS resolver contributes to an enrichment record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhoisInfo {
    /// Registrar name as reported (normalized later by the orchestrator)
    pub registrar: Option<String>,
    /// Registration date, truncated to a calendar date
    pub creation_date: Option<NaiveDate>,
    /// Secondary fields, stored but never used by merge logic
    pub details: WhoisDetails,
}

/// Secondary WHOIS fields kept for storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisDetails {
    /// Expiration date (`YYYY-MM-DD`)
    pub expiration_date: Option<String>,
    /// Last updated date (`YYYY-MM-DD`)
    pub updated_date: Option<String>,
    /// Nameservers, lower-cased, in first-seen order
    #[serde(default)]
    pub name_servers: Vec<String>,
    /// EPP status codes (e.g. "clientTransferProhibited")
    #[serde(default)]
    pub status: Vec<String>,
}

impl WhoisDetails {
    pub fn is_empty(&self) -> bool {
        self.expiration_date.is_none()
            && self.updated_date.is_none()
            && self.name_servers.is_empty()
            && self.status.is_empty()
    }
}
