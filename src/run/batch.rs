//! The batch driver.
//!
//! Domains are enriched one at a time in input order. Each record is written
//! to the relational sink and, when configured, mirrored into the graph
//! sink. A fixed pause follows every domain, whatever happened to it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::LOGGING_INTERVAL;
use crate::enrich::Enricher;
use crate::error_handling::ProcessingStats;
use crate::rate_limiter::{Clock, FixedWindowLimiter};
use crate::storage::{store_graph, store_relational, GraphSink, RelationalSink};

/// Per-run settings of the driver.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Stored with every domain
    pub source: String,
    pub notes: String,
    /// Pause after each domain
    pub inter_domain_delay: Duration,
    /// Skip domains that already have a stored enrichment
    pub skip_existing: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source: crate::config::UNKNOWN.to_string(),
            notes: String::new(),
            inter_domain_delay: Duration::from_millis(crate::config::INTER_DOMAIN_DELAY_MS),
            skip_existing: false,
        }
    }
}

/// Results of an enrichment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Domains in the input, after normalization and limit
    pub total_domains: usize,
    /// Domains enriched and stored
    pub stored: usize,
    /// Domains left out because they were already enriched
    pub skipped_existing: usize,
    /// Domains whose relational write failed
    pub storage_failures: usize,
    /// Domains whose graph write failed (their relational row was kept)
    pub graph_failures: usize,
    /// Resolver failures across all domains
    pub lookup_failures: usize,
    pub elapsed_seconds: f64,
}

/// Runs enrichment over a domain list against a pair of sinks.
pub struct BatchDriver {
    enricher: Enricher,
    limiter: Arc<FixedWindowLimiter>,
    relational: Arc<dyn RelationalSink>,
    graph: Option<Arc<dyn GraphSink>>,
    clock: Arc<dyn Clock>,
    stats: Arc<ProcessingStats>,
    options: BatchOptions,
}

impl BatchDriver {
    pub fn new(
        enricher: Enricher,
        limiter: Arc<FixedWindowLimiter>,
        relational: Arc<dyn RelationalSink>,
        clock: Arc<dyn Clock>,
        options: BatchOptions,
    ) -> Self {
        Self {
            enricher,
            limiter,
            relational,
            graph: None,
            clock,
            stats: Arc::new(ProcessingStats::new()),
            options,
        }
    }

    /// Mirrors every stored record into `graph`.
    pub fn with_graph(mut self, graph: Arc<dyn GraphSink>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }

    /// Enriches and stores `domains` in order.
    ///
    /// Resolver and storage failures are counted and never stop the batch.
    /// The only error is failing to read the existing domains when
    /// `skip_existing` is set.
    pub async fn run(&self, domains: Vec<String>) -> Result<BatchReport> {
        let start = Instant::now();
        let mut report = BatchReport {
            total_domains: domains.len(),
            ..Default::default()
        };

        let domains = if self.options.skip_existing {
            let existing = self.existing_domains().await?;
            let remaining: Vec<String> = domains
                .into_iter()
                .filter(|d| !existing.contains(d))
                .collect();
            report.skipped_existing = report.total_domains - remaining.len();
            info!(
                "Skipping {} already enriched domain(s), {} left",
                report.skipped_existing,
                remaining.len()
            );
            remaining
        } else {
            domains
        };

        let to_process = domains.len();
        for (index, domain) in domains.iter().enumerate() {
            info!("[{}/{}] Enriching {}", index + 1, to_process, domain);
            let record = self.enricher.enrich(domain, &self.limiter).await;

            for failure in &record.failures {
                self.stats.record_failure(failure);
            }
            report.lookup_failures += record.failures.len();

            match store_relational(
                self.relational.as_ref(),
                &record,
                &self.options.source,
                &self.options.notes,
            )
            .await
            {
                Ok(domain_id) => {
                    log::debug!("Stored {} as domain {}", domain, domain_id);
                    report.stored += 1;

                    if let Some(graph) = &self.graph {
                        if let Err(e) = store_graph(
                            graph.as_ref(),
                            &record,
                            &self.options.source,
                            &self.options.notes,
                        )
                        .await
                        {
                            warn!("Graph write failed for {}: {}", domain, e);
                            self.stats.increment_graph_failure();
                            report.graph_failures += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to store {}: {}", domain, e);
                    self.stats.increment_storage_failure();
                    report.storage_failures += 1;
                }
            }

            if (index + 1) % LOGGING_INTERVAL == 0 {
                info!(
                    "Processed {}/{} domains in {:.1}s",
                    index + 1,
                    to_process,
                    start.elapsed().as_secs_f64()
                );
            }

            if !self.options.inter_domain_delay.is_zero() {
                self.clock.sleep(self.options.inter_domain_delay).await;
            }
        }

        report.elapsed_seconds = start.elapsed().as_secs_f64();
        Ok(report)
    }

    async fn existing_domains(&self) -> Result<HashSet<String>> {
        let stored = self
            .relational
            .get_all_enriched_domains()
            .await
            .context("Failed to read stored domains")?;
        Ok(stored
            .into_iter()
            .filter(|s| s.is_enriched())
            .map(|s| s.domain)
            .collect())
    }
}
