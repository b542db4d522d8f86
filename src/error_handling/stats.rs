//! Processing statistics tracking.
//!
//! This module provides thread-safe counters for resolver failures and storage
//! failures observed during an enrichment run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{FailureReason, LookupFailure, LookupSource};

/// Thread-safe processing statistics tracker.
///
/// Every `LookupSource` and `FailureReason` is registered with a zero counter
/// on creation, so lookups never miss.
pub struct ProcessingStats {
    by_source: HashMap<LookupSource, AtomicUsize>,
    by_reason: HashMap<FailureReason, AtomicUsize>,
    storage_failures: AtomicUsize,
    graph_failures: AtomicUsize,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        let by_source = LookupSource::iter()
            .map(|source| (source, AtomicUsize::new(0)))
            .collect();
        let by_reason = FailureReason::iter()
            .map(|reason| (reason, AtomicUsize::new(0)))
            .collect();

        ProcessingStats {
            by_source,
            by_reason,
            storage_failures: AtomicUsize::new(0),
            graph_failures: AtomicUsize::new(0),
        }
    }

    /// Counts one resolver failure against its source and reason.
    pub fn record_failure(&self, failure: &LookupFailure) {
        if let Some(counter) = self.by_source.get(&failure.source) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(counter) = self.by_reason.get(&failure.reason) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Counts a relational write that aborted a domain.
    pub fn increment_storage_failure(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a graph write that was logged and skipped.
    pub fn increment_graph_failure(&self) {
        self.graph_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_failure_count(&self, source: LookupSource) -> usize {
        self.by_source
            .get(&source)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_reason_count(&self, reason: FailureReason) -> usize {
        self.by_reason
            .get(&reason)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total_failures(&self) -> usize {
        self.by_source
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    pub fn storage_failures(&self) -> usize {
        self.storage_failures.load(Ordering::SeqCst)
    }

    pub fn graph_failures(&self) -> usize {
        self.graph_failures.load(Ordering::SeqCst)
    }

    /// Logs a summary of every non-zero counter.
    pub fn log_summary(&self) {
        let total = self.total_failures();
        if total == 0 && self.storage_failures() == 0 && self.graph_failures() == 0 {
            log::info!("No resolver or storage failures");
            return;
        }

        log::info!("Resolver failures: {total}");
        for source in LookupSource::iter() {
            let count = self.get_failure_count(source);
            if count > 0 {
                log::info!("   {}: {}", source.as_str(), count);
            }
        }
        for reason in FailureReason::iter() {
            let count = self.get_reason_count(reason);
            if count > 0 {
                log::info!("   reason {}: {}", reason.as_str(), count);
            }
        }
        if self.storage_failures() > 0 {
            log::warn!("Domains aborted by storage errors: {}", self.storage_failures());
        }
        if self.graph_failures() > 0 {
            log::warn!("Graph writes skipped: {}", self.graph_failures());
        }
    }
}
