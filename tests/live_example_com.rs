//! Live-network enrichment of example.com.
//!
//! Ignored by default; run with `cargo test -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use domain_enrich::dns::{DnsRecordType, DnsResolver};
use domain_enrich::initialization::{init_client, init_resolver};
use domain_enrich::ip::IpResolver;
use domain_enrich::rate_limiter::TokioClock;
use domain_enrich::tech::TechClassifier;
use domain_enrich::whois::WhoisResolver;
use domain_enrich::{Config, Enricher, FixedWindowLimiter};

#[tokio::test]
#[ignore] // requires network access
async fn test_enrich_example_com() {
    let config = Config {
        timeout_seconds: 20,
        ..Default::default()
    };
    let client = init_client(&config).expect("HTTP client");
    let resolver = init_resolver().expect("DNS resolver");

    let enricher = Enricher::new(
        Arc::new(WhoisResolver::new(config.call_timeout())),
        Arc::new(DnsResolver::new(resolver)),
        Arc::new(IpResolver::new(Arc::clone(&client), None)),
        Arc::new(TechClassifier::new(client)),
    );
    let limiter = FixedWindowLimiter::new(
        45,
        Duration::from_secs(60),
        Duration::from_secs(1),
        Arc::new(TokioClock),
    );

    let record = enricher.enrich("example.com", &limiter).await;

    assert!(!record.records(DnsRecordType::A).is_empty());
    assert!(record.ip_address.is_some());
    assert_eq!(record.cms, None);
}
