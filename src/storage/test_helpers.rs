//! Shared test helpers for storage module tests.

#[cfg(test)]
use chrono::NaiveDate;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::dns::DnsRecordType;
#[cfg(test)]
use crate::enrich::EnrichmentRecord;
#[cfg(test)]
use crate::storage::run_migrations;
#[cfg(test)]
use crate::whois::WhoisDetails;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    // One connection: every connection to ":memory:" is its own database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A fully populated record for `domain`.
#[cfg(test)]
pub fn sample_record(domain: &str) -> EnrichmentRecord {
    let mut record = EnrichmentRecord::new(domain);
    record.ip_address = Some("192.0.2.10".to_string());
    record
        .dns_records
        .insert(DnsRecordType::A, vec!["192.0.2.10".to_string()]);
    record.dns_records.insert(
        DnsRecordType::NS,
        vec!["ns1.cloudflare.com".to_string()],
    );
    record.host_name = Some("Cloudflare, Inc.".to_string());
    record.isp = Some("Cloudflare, Inc.".to_string());
    record.asn = Some("13335".to_string());
    record.country = Some("United States".to_string());
    record.cdn = Some("Cloudflare".to_string());
    record.cms = Some("shopify".to_string());
    record.registrar = Some("GoDaddy".to_string());
    record.creation_date = NaiveDate::from_ymd_opt(2015, 6, 1);
    record.payment_processors = vec!["stripe".to_string(), "paypal".to_string()];
    record.whois = WhoisDetails {
        expiration_date: Some("2030-06-01".to_string()),
        updated_date: None,
        name_servers: vec!["ns1.cloudflare.com".to_string()],
        status: vec!["clientTransferProhibited".to_string()],
    };
    record.web_server = Some("cloudflare".to_string());
    record.technologies = vec!["jQuery".to_string()];
    record
}
