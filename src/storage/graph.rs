//! SQLite property-graph sink.
//!
//! Nodes live in `graph_nodes` keyed by `(label, name)`; edges in
//! `graph_edges` keyed by `(from, rel, to)`. Upserting a node merges its
//! JSON properties, so re-creating a node never loses earlier properties.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::{Row, SqlitePool};

use super::sink::GraphSink;
use crate::error_handling::DatabaseError;

/// Node labels.
pub mod label {
    pub const DOMAIN: &str = "Domain";
    pub const HOST: &str = "Host";
    pub const CDN: &str = "CDN";
    pub const CMS: &str = "CMS";
    pub const REGISTRAR: &str = "Registrar";
    pub const PAYMENT_PROCESSOR: &str = "PaymentProcessor";
}

/// Relationship types, always from a `Domain` node.
pub mod rel {
    pub const HOSTED_ON: &str = "HOSTED_ON";
    pub const USES_CDN: &str = "USES_CDN";
    pub const USES_CMS: &str = "USES_CMS";
    pub const REGISTERED_BY: &str = "REGISTERED_BY";
    pub const USES_PAYMENT: &str = "USES_PAYMENT";
}

/// A node as stored, for inspection and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub label: String,
    pub name: String,
    pub properties: Value,
}

/// Graph sink over the `graph_nodes` and `graph_edges` tables.
#[derive(Debug, Clone)]
pub struct SqliteGraphSink {
    pool: Arc<SqlitePool>,
}

impl SqliteGraphSink {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    async fn upsert_node(
        &self,
        label: &str,
        name: &str,
        properties: Value,
    ) -> Result<(), DatabaseError> {
        let properties = serde_json::to_string(&properties)?;
        sqlx::query(
            "INSERT INTO graph_nodes (label, name, properties)
             VALUES (?, ?, ?)
             ON CONFLICT(label, name) DO UPDATE SET
                 properties = json_patch(graph_nodes.properties, excluded.properties),
                 last_seen = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
        )
        .bind(label)
        .bind(name)
        .bind(properties)
        .execute(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;
        Ok(())
    }

    async fn link(
        &self,
        domain: &str,
        relation: &str,
        target_label: &str,
        target: &str,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO graph_edges (from_node, rel, to_node)
             SELECT d.id, ?, t.id
             FROM graph_nodes d, graph_nodes t
             WHERE d.label = ? AND d.name = ? AND t.label = ? AND t.name = ?
             ON CONFLICT(from_node, rel, to_node) DO NOTHING",
        )
        .bind(relation)
        .bind(label::DOMAIN)
        .bind(domain)
        .bind(target_label)
        .bind(target)
        .execute(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        if result.rows_affected() == 0 {
            log::trace!("No new {} edge {} -> {}", relation, domain, target);
        }
        Ok(())
    }

    /// All nodes with `node_label`, ordered by name.
    pub async fn nodes(&self, node_label: &str) -> Result<Vec<GraphNode>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT label, name, properties FROM graph_nodes WHERE label = ? ORDER BY name",
        )
        .bind(node_label)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        rows.iter()
            .map(|row| {
                let properties: String = row.try_get("properties")?;
                Ok(GraphNode {
                    label: row.try_get("label")?,
                    name: row.try_get("name")?,
                    properties: serde_json::from_str(&properties)?,
                })
            })
            .collect()
    }

    /// Names of the nodes `domain` reaches through `relation`, ordered.
    pub async fn neighbors(
        &self,
        domain: &str,
        relation: &str,
    ) -> Result<Vec<String>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT t.name
             FROM graph_edges e
             JOIN graph_nodes d ON d.id = e.from_node
             JOIN graph_nodes t ON t.id = e.to_node
             WHERE d.label = ? AND d.name = ? AND e.rel = ?
             ORDER BY t.name",
        )
        .bind(label::DOMAIN)
        .bind(domain)
        .bind(relation)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(DatabaseError::SqlError))
            .collect()
    }
}

fn optional_properties(pairs: &[(&str, Option<&str>)]) -> Value {
    let map: Map<String, Value> = pairs
        .iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), json!(v))))
        .collect();
    Value::Object(map)
}

#[async_trait]
impl GraphSink for SqliteGraphSink {
    async fn create_domain(
        &self,
        domain: &str,
        source: &str,
        notes: &str,
    ) -> Result<(), DatabaseError> {
        self.upsert_node(
            label::DOMAIN,
            domain,
            json!({ "source": source, "notes": notes }),
        )
        .await
    }

    /// Hosts are keyed by IP; `name` is stored as a property.
    async fn create_host(
        &self,
        name: &str,
        ip: &str,
        asn: Option<&str>,
        isp: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let properties =
            optional_properties(&[("name", Some(name)), ("asn", asn), ("isp", isp)]);
        self.upsert_node(label::HOST, ip, properties).await
    }

    async fn create_cdn(&self, name: &str) -> Result<(), DatabaseError> {
        self.upsert_node(label::CDN, name, json!({})).await
    }

    async fn create_cms(&self, name: &str) -> Result<(), DatabaseError> {
        self.upsert_node(label::CMS, name, json!({})).await
    }

    async fn create_registrar(&self, name: &str) -> Result<(), DatabaseError> {
        self.upsert_node(label::REGISTRAR, name, json!({})).await
    }

    async fn create_payment_processor(&self, name: &str) -> Result<(), DatabaseError> {
        self.upsert_node(label::PAYMENT_PROCESSOR, name, json!({}))
            .await
    }

    async fn link_domain_to_host(&self, domain: &str, ip: &str) -> Result<(), DatabaseError> {
        self.link(domain, rel::HOSTED_ON, label::HOST, ip).await
    }

    async fn link_domain_to_cdn(&self, domain: &str, cdn: &str) -> Result<(), DatabaseError> {
        self.link(domain, rel::USES_CDN, label::CDN, cdn).await
    }

    async fn link_domain_to_cms(&self, domain: &str, cms: &str) -> Result<(), DatabaseError> {
        self.link(domain, rel::USES_CMS, label::CMS, cms).await
    }

    async fn link_domain_to_registrar(
        &self,
        domain: &str,
        registrar: &str,
    ) -> Result<(), DatabaseError> {
        self.link(domain, rel::REGISTERED_BY, label::REGISTRAR, registrar)
            .await
    }

    async fn link_domain_to_payment(
        &self,
        domain: &str,
        processor: &str,
    ) -> Result<(), DatabaseError> {
        self.link(domain, rel::USES_PAYMENT, label::PAYMENT_PROCESSOR, processor)
            .await
    }

    async fn linked_cms_names(&self) -> Result<Vec<String>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT DISTINCT t.name
             FROM graph_edges e
             JOIN graph_nodes t ON t.id = e.to_node
             WHERE e.rel = ? AND t.label = ?
             ORDER BY t.name",
        )
        .bind(rel::USES_CMS)
        .bind(label::CMS)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(DatabaseError::SqlError))
            .collect()
    }

    async fn unlink_cms(&self, name: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM graph_edges
             WHERE rel = ?
               AND to_node IN (SELECT id FROM graph_nodes WHERE label = ? AND name = ?)",
        )
        .bind(rel::USES_CMS)
        .bind(label::CMS)
        .bind(name)
        .execute(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;
        Ok(result.rows_affected())
    }
}
