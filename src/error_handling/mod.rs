//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for initialization and storage
//! - The typed per-resolver failure (`LookupFailure`) every resolver returns
//! - Categorization of transport errors into failure reasons
//! - Processing statistics tracking (resolver failures, storage failures)
//!
//! Resolver failures are never propagated out of the enrichment pipeline:
//! they are recorded, logged and counted, and the affected fields stay absent.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_dns_error, categorize_io_error, categorize_reqwest_error, categorize_whois_error,
};
pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, FailureReason, InitializationError, LookupFailure, LookupOutcome, LookupSource,
};
