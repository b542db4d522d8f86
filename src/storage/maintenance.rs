//! Stored-data maintenance.

use std::collections::BTreeMap;

use crate::error_handling::DatabaseError;
use crate::tech::is_valid_cms;

use super::sink::{GraphSink, RelationalSink};

/// What a CMS cleanup removed, keyed by the rejected CMS value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsCleanReport {
    /// Relational rows whose CMS was cleared
    pub cleared_rows: BTreeMap<String, u64>,
    /// `USES_CMS` edges dropped from the graph
    pub removed_edges: BTreeMap<String, u64>,
}

impl CmsCleanReport {
    pub fn total_rows(&self) -> u64 {
        self.cleared_rows.values().sum()
    }

    pub fn total_edges(&self) -> u64 {
        self.removed_edges.values().sum()
    }
}

/// Re-validates every stored CMS value and removes the ones that are not a
/// CMS (UI frameworks, libraries, platforms).
///
/// The relational store keeps the domain row and only nulls its CMS; the
/// graph keeps the CMS node and drops the edges into it.
pub async fn clean_cms(
    relational: &dyn RelationalSink,
    graph: Option<&dyn GraphSink>,
) -> Result<CmsCleanReport, DatabaseError> {
    let mut report = CmsCleanReport::default();

    for (value, uses) in relational.cms_value_counts().await? {
        if is_valid_cms(Some(&value)) {
            continue;
        }
        let cleared = relational.clear_cms(&value).await?;
        log::info!("Cleared CMS '{}' from {} domain(s) ({} listed)", value, cleared, uses);
        report.cleared_rows.insert(value, cleared);
    }

    if let Some(graph) = graph {
        for name in graph.linked_cms_names().await? {
            if is_valid_cms(Some(&name)) {
                continue;
            }
            let removed = graph.unlink_cms(&name).await?;
            log::info!("Removed {} USES_CMS edge(s) to '{}'", removed, name);
            report.removed_edges.insert(name, removed);
        }
    }

    Ok(report)
}
