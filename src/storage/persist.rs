//! Writing one enrichment record to the sinks.

use crate::config::UNKNOWN;
use crate::enrich::EnrichmentRecord;
use crate::error_handling::DatabaseError;

use super::sink::{GraphSink, RelationalSink};

/// Registers the domain and stores its enrichment. Returns the domain id.
pub async fn store_relational(
    sink: &dyn RelationalSink,
    record: &EnrichmentRecord,
    source: &str,
    notes: &str,
) -> Result<i64, DatabaseError> {
    let domain_id = sink.insert_domain(&record.domain, source, notes).await?;
    sink.insert_enrichment(domain_id, record).await?;
    Ok(domain_id)
}

/// Mirrors `record` into the graph: the domain node, a node per known
/// provider, and an edge from the domain to each.
///
/// The host node is only written when the domain resolved to an IP; a host
/// without a name is stored as "Unknown".
pub async fn store_graph(
    sink: &dyn GraphSink,
    record: &EnrichmentRecord,
    source: &str,
    notes: &str,
) -> Result<(), DatabaseError> {
    let domain = record.domain.as_str();
    sink.create_domain(domain, source, notes).await?;

    if let Some(ip) = record.ip_address.as_deref() {
        let name = record.host_name.as_deref().unwrap_or(UNKNOWN);
        sink.create_host(name, ip, record.asn.as_deref(), record.isp.as_deref())
            .await?;
        sink.link_domain_to_host(domain, ip).await?;
    }

    if let Some(cdn) = record.cdn.as_deref() {
        sink.create_cdn(cdn).await?;
        sink.link_domain_to_cdn(domain, cdn).await?;
    }

    if let Some(cms) = record.cms.as_deref() {
        sink.create_cms(cms).await?;
        sink.link_domain_to_cms(domain, cms).await?;
    }

    if let Some(registrar) = record.registrar.as_deref() {
        sink.create_registrar(registrar).await?;
        sink.link_domain_to_registrar(domain, registrar).await?;
    }

    for processor in &record.payment_processors {
        sink.create_payment_processor(processor).await?;
        sink.link_domain_to_payment(domain, processor).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::graph::{label, rel, SqliteGraphSink};
    use crate::storage::relational::SqliteRelationalSink;
    use crate::storage::test_helpers::{create_test_pool, sample_record};

    #[tokio::test]
    async fn test_store_graph_writes_all_providers() {
        let graph = SqliteGraphSink::new(Arc::new(create_test_pool().await));
        let record = sample_record("shop.example");

        store_graph(&graph, &record, "test", "").await.unwrap();

        assert_eq!(
            graph.neighbors("shop.example", rel::HOSTED_ON).await.unwrap(),
            vec!["192.0.2.10"]
        );
        assert_eq!(
            graph.neighbors("shop.example", rel::USES_CDN).await.unwrap(),
            vec!["Cloudflare"]
        );
        assert_eq!(
            graph.neighbors("shop.example", rel::USES_CMS).await.unwrap(),
            vec!["shopify"]
        );
        assert_eq!(
            graph
                .neighbors("shop.example", rel::REGISTERED_BY)
                .await
                .unwrap(),
            vec!["GoDaddy"]
        );
        assert_eq!(
            graph
                .neighbors("shop.example", rel::USES_PAYMENT)
                .await
                .unwrap(),
            vec!["paypal", "stripe"]
        );
    }

    #[tokio::test]
    async fn test_store_graph_unnamed_host_is_unknown() {
        let graph = SqliteGraphSink::new(Arc::new(create_test_pool().await));
        let mut record = sample_record("bare.example");
        record.host_name = None;

        store_graph(&graph, &record, "test", "").await.unwrap();

        let hosts = graph.nodes(label::HOST).await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].properties["name"], UNKNOWN);
    }

    #[tokio::test]
    async fn test_store_graph_without_ip_writes_no_host() {
        let graph = SqliteGraphSink::new(Arc::new(create_test_pool().await));
        let mut record = sample_record("noip.example");
        record.ip_address = None;

        store_graph(&graph, &record, "test", "").await.unwrap();

        assert!(graph.nodes(label::HOST).await.unwrap().is_empty());
        assert_eq!(graph.nodes(label::DOMAIN).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_relational_is_idempotent_per_domain() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));
        let record = sample_record("shop.example");

        let first = store_relational(&sink, &record, "test", "").await.unwrap();
        let second = store_relational(&sink, &record, "test", "").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(sink.get_all_enriched_domains().await.unwrap().len(), 1);
    }
}
