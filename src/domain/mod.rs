//! Domain input normalization.
//!
//! Domains arrive as whatever the input list contains: bare names, URLs with
//! scheme and path, upper-case, `www.` prefixed. Every lookup runs against the
//! normalized form produced here.
//!
//! Key functions:
//! - `normalize_domain()` - Lower-cases and strips scheme, `www.`, port and path

use anyhow::{Context, Result};

/// Normalizes a raw domain or URL into the lookup form.
///
/// # Arguments
///
/// * `input` - A domain name or URL (e.g. "https://www.Example.com/path")
///
/// # Returns
///
/// The lower-cased host without `www.` prefix, port, path or trailing dot
/// (e.g. "example.com").
///
/// # Errors
///
/// Returns an error if the input is empty, cannot be parsed as a host, is an
/// IP address, or has no dot.
pub fn normalize_domain(input: &str) -> Result<String> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("Empty domain"));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.clone()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = url::Url::parse(&with_scheme)
        .with_context(|| format!("Failed to parse domain: {}", input.trim()))?;

    let host = match parsed.host() {
        Some(url::Host::Domain(host)) => host.to_string(),
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => {
            return Err(anyhow::anyhow!(
                "IP addresses are not domains: {}",
                input.trim()
            ));
        }
        None => return Err(anyhow::anyhow!("No host in input: {}", input.trim())),
    };

    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() || !host.contains('.') {
        return Err(anyhow::anyhow!("Not a domain name: {}", input.trim()));
    }

    Ok(host.to_string())
}
