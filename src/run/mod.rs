//! Run entry points.
//!
//! [`run_enrichment`] wires the resolvers, limiter and SQLite sinks from a
//! [`Config`] and drives the batch; [`run_clean_cms`] applies CMS
//! validation to what is already stored.

mod batch;
mod input;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

pub use batch::{BatchDriver, BatchOptions, BatchReport};
pub use input::{parse_domain_lines, read_domains};

use crate::config::Config;
use crate::dns::DnsResolver;
use crate::enrich::Enricher;
use crate::initialization::{init_client, init_rate_limiter, init_resolver};
use crate::ip::IpResolver;
use crate::rate_limiter::TokioClock;
use crate::storage::{
    clean_cms, init_db_pool_with_path, run_migrations, CmsCleanReport, GraphSink,
    SqliteGraphSink, SqliteRelationalSink,
};
use crate::tech::TechClassifier;
use crate::whois::WhoisResolver;

/// Enriches every domain in `config.file` and stores the results.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the database, HTTP client
/// or DNS resolver cannot be initialized. Failures of individual domains are
/// counted in the report instead.
pub async fn run_enrichment(config: Config) -> Result<BatchReport> {
    let domains = read_domains(&config.file, config.limit).await?;

    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let resolver = init_resolver().context("Failed to initialize DNS resolver")?;
    let limiter = init_rate_limiter(&config);

    if config.iplocate_api_key.is_some() {
        info!("IPLocate enabled, ip-api.com fills missing fields");
    }
    info!(
        "IP lookups limited to {} per {}s",
        limiter.max_per_window(),
        limiter.window().as_secs()
    );

    let enricher = Enricher::new(
        Arc::new(WhoisResolver::new(config.call_timeout())),
        Arc::new(DnsResolver::new(resolver)),
        Arc::new(IpResolver::new(
            Arc::clone(&client),
            config.iplocate_api_key.clone(),
        )),
        Arc::new(TechClassifier::new(client)),
    );

    let options = BatchOptions {
        source: config.source.clone(),
        notes: config.notes.clone(),
        inter_domain_delay: config.inter_domain_delay(),
        skip_existing: config.skip_existing,
    };
    let mut driver = BatchDriver::new(
        enricher,
        limiter,
        Arc::new(SqliteRelationalSink::new(Arc::clone(&pool))),
        Arc::new(TokioClock),
        options,
    );
    if config.no_graph {
        info!("Graph store disabled");
    } else {
        driver = driver.with_graph(Arc::new(SqliteGraphSink::new(Arc::clone(&pool))));
    }

    let report = driver.run(domains).await?;

    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(pool.as_ref())
        .await
    {
        warn!("Failed to checkpoint WAL file (this is non-critical): {}", e);
    }
    pool.close().await;

    driver.stats().log_summary();
    info!(
        "Stored {} of {} domain(s) in {:.1}s",
        report.stored, report.total_domains, report.elapsed_seconds
    );

    Ok(report)
}

/// Clears stored CMS values that fail CMS validation.
pub async fn run_clean_cms(config: Config) -> Result<CmsCleanReport> {
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let relational = SqliteRelationalSink::new(Arc::clone(&pool));
    let graph_sink = SqliteGraphSink::new(Arc::clone(&pool));
    let graph: Option<&dyn GraphSink> = if config.no_graph {
        None
    } else {
        Some(&graph_sink)
    };

    let report = clean_cms(&relational, graph)
        .await
        .context("Failed to clean CMS values")?;
    pool.close().await;

    info!(
        "CMS cleanup: {} row(s) cleared, {} graph edge(s) removed",
        report.total_rows(),
        report.total_edges()
    );
    Ok(report)
}
