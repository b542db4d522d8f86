//! Domain list input.
//!
//! One domain (or URL) per line. Blank lines and `#` comments are skipped,
//! every entry is normalized, invalid entries are logged and dropped, and
//! repeats keep their first position.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::domain::normalize_domain;

/// Reads the domain list from `path`, or stdin when `path` is `-`.
pub async fn read_domains(path: &Path, limit: Option<usize>) -> Result<Vec<String>> {
    let lines = if path.as_os_str() == "-" {
        info!("Reading domains from stdin");
        read_lines(tokio::io::stdin()).await?
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        read_lines(file).await?
    };

    let domains = parse_domain_lines(lines, limit);
    info!("Loaded {} domain(s)", domains.len());
    Ok(domains)
}

async fn read_lines<R: AsyncRead + Unpin>(reader: R) -> Result<Vec<String>> {
    let mut lines = BufReader::new(reader).lines();
    let mut out = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read line from input")?
    {
        out.push(line);
    }
    Ok(out)
}

/// Filters, normalizes and deduplicates raw input lines, keeping at most
/// `limit` domains.
pub fn parse_domain_lines<I>(lines: I, limit: Option<usize>) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut domains = Vec::new();

    for line in lines {
        if limit.is_some_and(|max| domains.len() >= max) {
            break;
        }
        let trimmed = line.as_ref().trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match normalize_domain(trimmed) {
            Ok(domain) => {
                if seen.insert(domain.clone()) {
                    domains.push(domain);
                } else {
                    log::debug!("Skipping repeated domain {}", domain);
                }
            }
            Err(e) => warn!("Skipping invalid input line '{}': {}", trimmed, e),
        }
    }

    domains
}
