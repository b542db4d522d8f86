//! Resolver seams.
//!
//! The orchestrator talks to its sources through these traits so tests can
//! substitute fakes. The production resolvers implement them directly.

use async_trait::async_trait;

use crate::dns::{DnsInfo, DnsResolver};
use crate::error_handling::LookupOutcome;
use crate::ip::{IpInfo, IpResolver};
use crate::tech::{TechClassifier, TechProfile};
use crate::whois::{WhoisInfo, WhoisResolver};

#[async_trait]
pub trait WhoisLookup: Send + Sync {
    async fn lookup_whois(&self, domain: &str) -> LookupOutcome<WhoisInfo>;
}

/// DNS never fails as a whole; per-type failures travel inside [`DnsInfo`].
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn resolve_dns(&self, domain: &str) -> DnsInfo;
}

#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn lookup_ip(&self, ip: &str) -> LookupOutcome<IpInfo>;
}

#[async_trait]
pub trait TechLookup: Send + Sync {
    async fn classify_tech(&self, domain: &str) -> LookupOutcome<TechProfile>;
}

#[async_trait]
impl WhoisLookup for WhoisResolver {
    async fn lookup_whois(&self, domain: &str) -> LookupOutcome<WhoisInfo> {
        self.lookup(domain).await
    }
}

#[async_trait]
impl DnsLookup for DnsResolver {
    async fn resolve_dns(&self, domain: &str) -> DnsInfo {
        self.resolve(domain).await
    }
}

#[async_trait]
impl IpLookup for IpResolver {
    async fn lookup_ip(&self, ip: &str) -> LookupOutcome<IpInfo> {
        self.lookup(ip).await
    }
}

#[async_trait]
impl TechLookup for TechClassifier {
    async fn classify_tech(&self, domain: &str) -> LookupOutcome<TechProfile> {
        self.classify(domain).await
    }
}
