//! Storage sink contracts.
//!
//! The batch driver writes every enrichment to a relational sink and,
//! unless disabled, to a graph sink. Both are traits so the driver can be
//! exercised against in-memory stores.

use async_trait::async_trait;

use super::relational::StoredEnrichment;
use crate::enrich::EnrichmentRecord;
use crate::error_handling::DatabaseError;

/// Tabular store: one row per domain plus its latest enrichment.
#[async_trait]
pub trait RelationalSink: Send + Sync {
    /// Registers `domain`, returning its id. A repeated domain keeps its id
    /// and takes the new source and notes.
    async fn insert_domain(
        &self,
        domain: &str,
        source: &str,
        notes: &str,
    ) -> Result<i64, DatabaseError>;

    /// Stores `record` for `domain_id`, replacing any earlier enrichment.
    async fn insert_enrichment(
        &self,
        domain_id: i64,
        record: &EnrichmentRecord,
    ) -> Result<(), DatabaseError>;

    /// Every registered domain with its enrichment, ordered by domain.
    async fn get_all_enriched_domains(&self) -> Result<Vec<StoredEnrichment>, DatabaseError>;

    /// Distinct stored CMS values with the number of domains using each.
    async fn cms_value_counts(&self) -> Result<Vec<(String, u64)>, DatabaseError>;

    /// Clears `cms` wherever it equals `value`; returns the rows changed.
    async fn clear_cms(&self, value: &str) -> Result<u64, DatabaseError>;
}

/// Property graph of domains and the providers behind them.
///
/// Nodes are upserted by name (hosts by IP); names arrive normalized.
/// Linking to a node that does not exist is a no-op.
#[async_trait]
pub trait GraphSink: Send + Sync {
    async fn create_domain(&self, domain: &str, source: &str, notes: &str)
        -> Result<(), DatabaseError>;

    async fn create_host(
        &self,
        name: &str,
        ip: &str,
        asn: Option<&str>,
        isp: Option<&str>,
    ) -> Result<(), DatabaseError>;

    async fn create_cdn(&self, name: &str) -> Result<(), DatabaseError>;

    async fn create_cms(&self, name: &str) -> Result<(), DatabaseError>;

    async fn create_registrar(&self, name: &str) -> Result<(), DatabaseError>;

    async fn create_payment_processor(&self, name: &str) -> Result<(), DatabaseError>;

    async fn link_domain_to_host(&self, domain: &str, ip: &str) -> Result<(), DatabaseError>;

    async fn link_domain_to_cdn(&self, domain: &str, cdn: &str) -> Result<(), DatabaseError>;

    async fn link_domain_to_cms(&self, domain: &str, cms: &str) -> Result<(), DatabaseError>;

    async fn link_domain_to_registrar(
        &self,
        domain: &str,
        registrar: &str,
    ) -> Result<(), DatabaseError>;

    async fn link_domain_to_payment(
        &self,
        domain: &str,
        processor: &str,
    ) -> Result<(), DatabaseError>;

    /// Names of every CMS node that has at least one domain linked to it.
    async fn linked_cms_names(&self) -> Result<Vec<String>, DatabaseError>;

    /// Drops every `USES_CMS` edge into the CMS node `name`; returns the
    /// number of edges removed.
    async fn unlink_cms(&self, name: &str) -> Result<u64, DatabaseError>;
}
