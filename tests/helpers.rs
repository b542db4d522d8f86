// Shared test helpers for database setup, input files and fake resolvers.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test binary uses a different subset

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempfile::NamedTempFile;

use domain_enrich::dns::{empty_records, DnsInfo, DnsRecordType};
use domain_enrich::enrich::{DnsLookup, IpLookup, TechLookup, WhoisLookup};
use domain_enrich::error_handling::{FailureReason, LookupFailure, LookupOutcome, LookupSource};
use domain_enrich::ip::IpInfo;
use domain_enrich::rate_limiter::{Clock, ManualClock};
use domain_enrich::run_migrations;
use domain_enrich::tech::TechProfile;
use domain_enrich::whois::WhoisInfo;

/// Creates a test database pool with migrations applied.
/// Uses a single-connection in-memory database for fast test execution.
pub async fn create_test_pool() -> Arc<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Arc::new(pool)
}

/// Writes one entry per line to a temporary file.
pub fn write_domains_to_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write domain");
    }
    file.flush().expect("Failed to flush file");
    file
}

pub fn timeout_failure(source: LookupSource) -> LookupFailure {
    LookupFailure::new(source, FailureReason::Timeout, "timed out")
}

/// WHOIS fake answering the same registrar for every domain.
pub struct StaticWhois(pub LookupOutcome<WhoisInfo>);

#[async_trait]
impl WhoisLookup for StaticWhois {
    async fn lookup_whois(&self, _domain: &str) -> LookupOutcome<WhoisInfo> {
        self.0.clone()
    }
}

/// DNS fake resolving every domain to `ip`, or failing every record type.
pub struct StaticDns {
    pub ip: Option<&'static str>,
    pub nameserver: Option<&'static str>,
}

#[async_trait]
impl DnsLookup for StaticDns {
    async fn resolve_dns(&self, _domain: &str) -> DnsInfo {
        let Some(ip) = self.ip else {
            let failures = [
                LookupSource::DnsA,
                LookupSource::DnsAaaa,
                LookupSource::DnsMx,
                LookupSource::DnsNs,
                LookupSource::DnsCname,
            ]
            .into_iter()
            .map(timeout_failure)
            .collect();
            return DnsInfo::from_records(empty_records(), failures);
        };

        let mut records = empty_records();
        records.insert(DnsRecordType::A, vec![ip.to_string()]);
        if let Some(ns) = self.nameserver {
            records.insert(DnsRecordType::NS, vec![ns.to_string()]);
        }
        DnsInfo::from_records(records, Vec::new())
    }
}

/// IP fake that records, per call, how far the clock had moved.
pub struct ClockedIp {
    pub clock: Arc<ManualClock>,
    pub call_times: Mutex<Vec<Duration>>,
    pub info: IpInfo,
}

impl ClockedIp {
    pub fn new(clock: Arc<ManualClock>, info: IpInfo) -> Self {
        Self {
            clock,
            call_times: Mutex::new(Vec::new()),
            info,
        }
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.call_times.lock().expect("call log poisoned").clone()
    }
}

#[async_trait]
impl IpLookup for ClockedIp {
    async fn lookup_ip(&self, _ip: &str) -> LookupOutcome<IpInfo> {
        let elapsed = self.clock.elapsed();
        self.call_times
            .lock()
            .expect("call log poisoned")
            .push(elapsed);
        Ok(self.info.clone())
    }
}

/// Technology fake returning a fixed profile and counting calls.
pub struct StaticTech {
    pub profile: LookupOutcome<TechProfile>,
    pub calls: AtomicUsize,
}

impl StaticTech {
    pub fn new(profile: LookupOutcome<TechProfile>) -> Self {
        Self {
            profile,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TechLookup for StaticTech {
    async fn classify_tech(&self, _domain: &str) -> LookupOutcome<TechProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profile.clone()
    }
}

/// Keeps `ManualClock` reachable as a `dyn Clock` for drivers.
pub fn as_clock(clock: &Arc<ManualClock>) -> Arc<dyn Clock> {
    Arc::clone(clock) as Arc<dyn Clock>
}
