//! domain_enrich library: domain infrastructure enrichment
//!
//! This library enriches domain names with registration, DNS, hosting,
//! CDN, CMS and payment-processor metadata, and stores the results in a
//! relational table set and a property graph in SQLite.
//!
//! # Example
//!
//! ```no_run
//! use domain_enrich::{run_enrichment, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("domains.txt"),
//!     limit: Some(10),
//!     ..Default::default()
//! };
//!
//! let report = run_enrichment(config).await?;
//! println!("Stored {} of {} domains", report.stored, report.total_domains);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod dns;
pub mod domain;
pub mod enrich;
pub mod error_handling;
pub mod initialization;
pub mod ip;
pub mod normalize;
pub mod rate_limiter;
mod run;
pub mod storage;
pub mod tech;
pub mod whois;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use enrich::{EnrichmentRecord, Enricher};
pub use rate_limiter::FixedWindowLimiter;
pub use run::{
    parse_domain_lines, read_domains, run_clean_cms, run_enrichment, BatchDriver, BatchOptions,
    BatchReport,
};
pub use storage::{run_migrations, CmsCleanReport, StoredEnrichment};
