//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, pacing policy and size limits.

use std::time::Duration;

pub const DB_PATH: &str = "./domain_enrich.db";

/// Progress is logged every N domains
pub const LOGGING_INTERVAL: usize = 5;

// Network operation timeouts
/// Per external call timeout in seconds (WHOIS, IP API, page fetch).
/// Generous on purpose: a slow target costs one resolver, never the batch.
pub const EXTERNAL_CALL_TIMEOUT_SECS: u64 = 30;
/// DNS query timeout in seconds (per attempt)
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// DNS attempts per query
pub const DNS_ATTEMPTS: usize = 2;

// IP lookup pacing (ip-api.com free tier)
/// Maximum IP-resolving enrichments per window
pub const IP_LOOKUPS_PER_WINDOW: u32 = 45;
/// Window length in seconds, measured from the first call in the window
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;
/// Extra wait added when the cap is reached before the window ends
pub const RATE_LIMIT_SAFETY_MARGIN: Duration = Duration::from_secs(1);
/// Fixed pause between domains, regardless of whether the IP lookup fired
pub const INTER_DOMAIN_DELAY_MS: u64 = 1000;

// WHOIS
/// Maximum registrar referrals followed from the registry answer
pub const WHOIS_MAX_REFERRAL_DEPTH: usize = 3;
/// Maximum WHOIS response size in bytes (1MB)
pub const WHOIS_MAX_RESPONSE_SIZE: usize = 1024 * 1024;

// IP geolocation providers
/// ip-api.com JSON endpoint (free tier: 45 requests/minute, HTTP only)
pub const IP_API_BASE_URL: &str = "http://ip-api.com";
/// IPLocate endpoint, used first when an API key is configured
pub const IPLOCATE_BASE_URL: &str = "https://www.iplocate.io";
/// Environment variable holding the IPLocate API key
pub const IPLOCATE_API_KEY_ENV: &str = "IPLOCATE_API_KEY";

// Page fetching
/// Maximum response body size in bytes (2MB)
/// Larger bodies are truncated before technology detection
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default User-Agent string for page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Sentinel stored in place of a missing host name in the graph store
pub const UNKNOWN: &str = "Unknown";
