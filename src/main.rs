//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_enrich` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use domain_enrich::initialization::init_logger_with;
use domain_enrich::{run_clean_cms, run_enrichment, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // IPLOCATE_API_KEY may live in .env, next to the binary or in the cwd
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let db_path = config.db_path.clone();

    if config.clean_cms {
        return match run_clean_cms(config).await {
            Ok(report) => {
                for (value, rows) in &report.cleared_rows {
                    println!("Cleared CMS '{}' from {} domain(s)", value, rows);
                }
                println!(
                    "CMS cleanup done: {} row(s) cleared, {} graph edge(s) removed",
                    report.total_rows(),
                    report.total_edges()
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("domain_enrich error: {:#}", e);
                process::exit(1);
            }
        };
    }

    match run_enrichment(config).await {
        Ok(report) => {
            println!(
                "Enriched {} domain{} ({} stored, {} skipped, {} storage failures) in {:.1}s",
                report.total_domains,
                if report.total_domains == 1 { "" } else { "s" },
                report.stored,
                report.skipped_existing,
                report.storage_failures,
                report.elapsed_seconds
            );
            println!("Results saved in {}", db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_enrich error: {:#}", e);
            process::exit(1);
        }
    }
}
