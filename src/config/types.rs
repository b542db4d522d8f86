//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_USER_AGENT, EXTERNAL_CALL_TIMEOUT_SECS, INTER_DOMAIN_DELAY_MS,
    IPLOCATE_API_KEY_ENV, IP_LOOKUPS_PER_WINDOW, RATE_LIMIT_WINDOW_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Enrichment run configuration.
///
/// Parsed from the command line by the binary, or constructed directly by
/// library callers.
///
/// # Examples
///
/// ```no_run
/// use domain_enrich::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("domains.txt"),
///     limit: Some(10),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "domain_enrich",
    about = "Enrich domains with DNS, WHOIS, hosting, CDN, CMS and payment metadata"
)]
pub struct Config {
    /// File to read domains from (one per line, `#` comments, `-` for stdin)
    #[arg(default_value = "domains.txt")]
    pub file: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, default_value = DB_PATH, env = "DOMAIN_ENRICH_DB_PATH")]
    pub db_path: PathBuf,

    /// Where the domain list came from (stored with each domain)
    #[arg(long, default_value = "Unknown")]
    pub source: String,

    /// Free-form notes stored with each domain
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Only process the first N domains
    #[arg(long)]
    pub limit: Option<usize>,

    /// Timeout for every external call in seconds
    #[arg(long, default_value_t = EXTERNAL_CALL_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Maximum IP-resolving enrichments per window
    #[arg(long, default_value_t = IP_LOOKUPS_PER_WINDOW)]
    pub ip_lookups_per_window: u32,

    /// Rate limit window length in seconds
    #[arg(long, default_value_t = RATE_LIMIT_WINDOW_SECS)]
    pub window_seconds: u64,

    /// Pause between domains in milliseconds
    #[arg(long, default_value_t = INTER_DOMAIN_DELAY_MS)]
    pub inter_domain_delay_ms: u64,

    /// Skip the graph store
    #[arg(long)]
    pub no_graph: bool,

    /// Skip domains that already have a stored enrichment
    #[arg(long)]
    pub skip_existing: bool,

    /// Clear stored CMS values that fail CMS validation, then exit
    #[arg(long)]
    pub clean_cms: bool,

    /// IPLocate API key (queried before ip-api.com when set)
    #[arg(long, env = IPLOCATE_API_KEY_ENV, hide_env_values = true)]
    pub iplocate_api_key: Option<String>,

    /// HTTP User-Agent header value for page fetches
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Config {
    /// Timeout applied to each external call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Length of the IP lookup rate limit window.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    /// Pause inserted after every domain.
    pub fn inter_domain_delay(&self) -> Duration {
        Duration::from_millis(self.inter_domain_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("domains.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            source: "Unknown".to_string(),
            notes: String::new(),
            limit: None,
            timeout_seconds: EXTERNAL_CALL_TIMEOUT_SECS,
            ip_lookups_per_window: IP_LOOKUPS_PER_WINDOW,
            window_seconds: RATE_LIMIT_WINDOW_SECS,
            inter_domain_delay_ms: INTER_DOMAIN_DELAY_MS,
            no_graph: false,
            skip_existing: false,
            clean_cms: false,
            iplocate_api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
