//! SQLite relational sink.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::sink::RelationalSink;
use crate::dns::{empty_records, DnsRecords};
use crate::enrich::EnrichmentRecord;
use crate::error_handling::DatabaseError;
use crate::tech::{join_processors, split_processors};
use crate::whois::WhoisDetails;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A domain as read back from the relational store.
///
/// Enrichment fields are all absent for a domain that was registered but
/// never enriched; `enriched_at` tells the two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEnrichment {
    pub domain: String,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub ip_address: Option<String>,
    pub host_name: Option<String>,
    pub asn: Option<String>,
    pub isp: Option<String>,
    pub country: Option<String>,
    pub cdn: Option<String>,
    pub cms: Option<String>,
    pub payment_processors: Vec<String>,
    pub registrar: Option<String>,
    pub creation_date: Option<NaiveDate>,
    pub web_server: Option<String>,
    pub technologies: Vec<String>,
    pub dns_records: DnsRecords,
    pub whois: WhoisDetails,
    pub enriched_at: Option<String>,
}

impl StoredEnrichment {
    pub fn is_enriched(&self) -> bool {
        self.enriched_at.is_some()
    }

    fn from_row(row: &SqliteRow) -> Result<Self, DatabaseError> {
        let processors: Option<String> = row.try_get("payment_processor")?;
        let creation_date: Option<String> = row.try_get("creation_date")?;
        let technologies: Option<String> = row.try_get("technologies")?;
        let dns_records: Option<String> = row.try_get("dns_records")?;
        let whois_data: Option<String> = row.try_get("whois_data")?;

        Ok(Self {
            domain: row.try_get("domain")?,
            source: row.try_get("source")?,
            notes: row.try_get("notes")?,
            ip_address: row.try_get("ip_address")?,
            host_name: row.try_get("host_name")?,
            asn: row.try_get("asn")?,
            isp: row.try_get("isp")?,
            country: row.try_get("country")?,
            cdn: row.try_get("cdn")?,
            cms: row.try_get("cms")?,
            payment_processors: processors
                .as_deref()
                .map(split_processors)
                .unwrap_or_default(),
            registrar: row.try_get("registrar")?,
            // A date that does not parse reads back as absent
            creation_date: creation_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()),
            web_server: row.try_get("web_server")?,
            technologies: match technologies {
                Some(json) => serde_json::from_str(&json)?,
                None => Vec::new(),
            },
            dns_records: match dns_records {
                Some(json) => serde_json::from_str(&json)?,
                None => empty_records(),
            },
            whois: match whois_data {
                Some(json) => serde_json::from_str(&json)?,
                None => WhoisDetails::default(),
            },
            enriched_at: row.try_get("enriched_at")?,
        })
    }
}

/// Relational sink over the `domains` and `domain_enrichment` tables.
#[derive(Debug, Clone)]
pub struct SqliteRelationalSink {
    pool: Arc<SqlitePool>,
}

impl SqliteRelationalSink {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationalSink for SqliteRelationalSink {
    async fn insert_domain(
        &self,
        domain: &str,
        source: &str,
        notes: &str,
    ) -> Result<i64, DatabaseError> {
        let row = sqlx::query(
            "INSERT INTO domains (domain, source, notes)
             VALUES (?, ?, ?)
             ON CONFLICT(domain) DO UPDATE SET
                 source = excluded.source,
                 notes = excluded.notes,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
             RETURNING id",
        )
        .bind(domain)
        .bind(source)
        .bind(notes)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        Ok(row.get::<i64, _>(0))
    }

    async fn insert_enrichment(
        &self,
        domain_id: i64,
        record: &EnrichmentRecord,
    ) -> Result<(), DatabaseError> {
        let dns_records = serde_json::to_string(&record.dns_records)?;
        let technologies = serde_json::to_string(&record.technologies)?;
        let whois_data = if record.whois.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&record.whois)?)
        };
        let creation_date = record
            .creation_date
            .map(|d| d.format(DATE_FORMAT).to_string());

        sqlx::query(
            "INSERT INTO domain_enrichment (
                 domain_id, ip_address, host_name, asn, isp, country, cdn, cms,
                 payment_processor, registrar, creation_date, web_server,
                 technologies, dns_records, whois_data
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(domain_id) DO UPDATE SET
                 ip_address = excluded.ip_address,
                 host_name = excluded.host_name,
                 asn = excluded.asn,
                 isp = excluded.isp,
                 country = excluded.country,
                 cdn = excluded.cdn,
                 cms = excluded.cms,
                 payment_processor = excluded.payment_processor,
                 registrar = excluded.registrar,
                 creation_date = excluded.creation_date,
                 web_server = excluded.web_server,
                 technologies = excluded.technologies,
                 dns_records = excluded.dns_records,
                 whois_data = excluded.whois_data,
                 enriched_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
        )
        .bind(domain_id)
        .bind(&record.ip_address)
        .bind(&record.host_name)
        .bind(&record.asn)
        .bind(&record.isp)
        .bind(&record.country)
        .bind(&record.cdn)
        .bind(&record.cms)
        .bind(join_processors(&record.payment_processors))
        .bind(&record.registrar)
        .bind(creation_date)
        .bind(&record.web_server)
        .bind(technologies)
        .bind(dns_records)
        .bind(whois_data)
        .execute(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        Ok(())
    }

    async fn get_all_enriched_domains(&self) -> Result<Vec<StoredEnrichment>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT d.domain, d.source, d.notes,
                    e.ip_address, e.host_name, e.asn, e.isp, e.country, e.cdn, e.cms,
                    e.payment_processor, e.registrar, e.creation_date, e.web_server,
                    e.technologies, e.dns_records, e.whois_data, e.enriched_at
             FROM domains d
             LEFT JOIN domain_enrichment e ON e.domain_id = d.id
             ORDER BY d.domain",
        )
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        rows.iter().map(StoredEnrichment::from_row).collect()
    }

    async fn cms_value_counts(&self) -> Result<Vec<(String, u64)>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT cms, COUNT(*) AS uses
             FROM domain_enrichment
             WHERE cms IS NOT NULL
             GROUP BY cms
             ORDER BY cms",
        )
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(DatabaseError::SqlError)?;

        rows.iter()
            .map(|row| {
                let cms: String = row.try_get("cms")?;
                let uses: i64 = row.try_get("uses")?;
                Ok((cms, uses.max(0) as u64))
            })
            .collect()
    }

    async fn clear_cms(&self, value: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE domain_enrichment SET cms = NULL WHERE cms = ?")
            .bind(value)
            .execute(self.pool.as_ref())
            .await
            .map_err(DatabaseError::SqlError)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::DnsRecordType;
    use crate::storage::test_helpers::{create_test_pool, sample_record};

    #[tokio::test]
    async fn test_insert_domain_returns_same_id_on_repeat() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));

        let first = sink.insert_domain("example.com", "list-a", "").await.unwrap();
        let other = sink.insert_domain("example.org", "list-a", "").await.unwrap();
        let again = sink
            .insert_domain("example.com", "list-b", "second pass")
            .await
            .unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);

        let stored = sink.get_all_enriched_domains().await.unwrap();
        let example = stored.iter().find(|s| s.domain == "example.com").unwrap();
        assert_eq!(example.source.as_deref(), Some("list-b"));
        assert_eq!(example.notes.as_deref(), Some("second pass"));
    }

    #[tokio::test]
    async fn test_enrichment_round_trips_through_store() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));
        let record = sample_record("shop.example");

        let id = sink.insert_domain("shop.example", "test", "").await.unwrap();
        sink.insert_enrichment(id, &record).await.unwrap();

        let stored = sink.get_all_enriched_domains().await.unwrap();
        assert_eq!(stored.len(), 1);
        let stored = &stored[0];
        assert!(stored.is_enriched());
        assert_eq!(stored.ip_address, record.ip_address);
        assert_eq!(stored.host_name, record.host_name);
        assert_eq!(stored.cdn.as_deref(), Some("Cloudflare"));
        assert_eq!(stored.cms.as_deref(), Some("shopify"));
        assert_eq!(stored.payment_processors, vec!["stripe", "paypal"]);
        assert_eq!(stored.creation_date, record.creation_date);
        assert_eq!(stored.technologies, record.technologies);
        assert_eq!(
            stored.dns_records.get(&DnsRecordType::A),
            Some(&vec!["192.0.2.10".to_string()])
        );
        assert_eq!(stored.whois, record.whois);
    }

    #[tokio::test]
    async fn test_repeated_enrichment_replaces_previous_row() {
        let pool = Arc::new(create_test_pool().await);
        let sink = SqliteRelationalSink::new(Arc::clone(&pool));

        let id = sink.insert_domain("shop.example", "test", "").await.unwrap();
        sink.insert_enrichment(id, &sample_record("shop.example"))
            .await
            .unwrap();

        let mut second = sample_record("shop.example");
        second.cms = None;
        second.payment_processors.clear();
        sink.insert_enrichment(id, &second).await.unwrap();

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM domain_enrichment")
            .fetch_one(pool.as_ref())
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = sink.get_all_enriched_domains().await.unwrap();
        assert_eq!(stored[0].cms, None);
        assert!(stored[0].payment_processors.is_empty());
    }

    #[tokio::test]
    async fn test_unenriched_domain_is_listed_without_fields() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));
        sink.insert_domain("pending.example", "test", "").await.unwrap();

        let stored = sink.get_all_enriched_domains().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].is_enriched());
        assert_eq!(stored[0].ip_address, None);
        assert!(stored[0].payment_processors.is_empty());
        assert_eq!(stored[0].dns_records, empty_records());
    }

    #[tokio::test]
    async fn test_domains_listed_in_name_order() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));
        for domain in ["zeta.example", "alpha.example", "mid.example"] {
            sink.insert_domain(domain, "test", "").await.unwrap();
        }

        let names: Vec<String> = sink
            .get_all_enriched_domains()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.domain)
            .collect();
        assert_eq!(names, vec!["alpha.example", "mid.example", "zeta.example"]);
    }

    #[tokio::test]
    async fn test_enrichment_for_unknown_domain_id_fails() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));
        let result = sink
            .insert_enrichment(9999, &sample_record("ghost.example"))
            .await;
        assert!(matches!(result, Err(DatabaseError::SqlError(_))));
    }

    #[tokio::test]
    async fn test_cms_counts_and_clear() {
        let sink = SqliteRelationalSink::new(Arc::new(create_test_pool().await));
        for (domain, cms) in [
            ("a.example", Some("bootstrap")),
            ("b.example", Some("bootstrap")),
            ("c.example", Some("wordpress")),
            ("d.example", None),
        ] {
            let id = sink.insert_domain(domain, "test", "").await.unwrap();
            let mut record = sample_record(domain);
            record.cms = cms.map(str::to_string);
            sink.insert_enrichment(id, &record).await.unwrap();
        }

        let counts = sink.cms_value_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![("bootstrap".to_string(), 2), ("wordpress".to_string(), 1)]
        );

        assert_eq!(sink.clear_cms("bootstrap").await.unwrap(), 2);
        assert_eq!(sink.clear_cms("bootstrap").await.unwrap(), 0);
        assert_eq!(
            sink.cms_value_counts().await.unwrap(),
            vec![("wordpress".to_string(), 1)]
        );
    }
}
