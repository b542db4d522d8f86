//! Technology classification.
//!
//! Fetches a domain's homepage once and derives from it:
//! - the CMS (validated against the CMS deny/allow lists, lower-cased)
//! - payment processors referenced by the page
//! - the web server banner and other technology tokens
//! - a CDN hint from response headers
//!
//! Detection itself is pure and lives in [`detection`]; this module only
//! adds the fetch and the failure boundary.

mod cms;
mod detection;
mod fetch;
mod payment;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use cms::{canonical_cms, is_valid_cms, NOT_CMS, VALID_CMS_PLATFORMS};
pub use detection::{cdn_from_headers, cms_from_markers, detect, select_cms, CMS_MARKERS};
pub use fetch::{FetchedPage, PageFetcher};
pub use payment::{
    detect_payment_processors, join_processors, split_processors, PAYMENT_PROCESSORS,
    UNKNOWN_PROCESSOR,
};

use crate::error_handling::LookupOutcome;

/// What the technology classifier contributes to an enrichment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechProfile {
    /// Canonical lower-case CMS name
    pub cms: Option<String>,
    /// Processors in detection order
    pub payment_processors: Vec<String>,
    /// Every technology token seen, first-seen order
    pub technologies: Vec<String>,
    /// `Server` header value
    pub web_server: Option<String>,
    /// CDN implied by response headers
    pub cdn: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TechClassifier {
    fetcher: PageFetcher,
}

impl TechClassifier {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            fetcher: PageFetcher::new(client),
        }
    }

    pub fn with_fetcher(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches the domain's homepage and classifies it.
    pub async fn classify(&self, domain: &str) -> LookupOutcome<TechProfile> {
        match self.fetcher.fetch(domain).await {
            Ok(page) => {
                log::debug!(
                    "Fetched {} ({} bytes, status {})",
                    page.final_url,
                    page.body.len(),
                    page.status
                );
                Ok(detect(&page))
            }
            Err(e) => {
                log::warn!("Technology detection failed for {}: {}", domain, e);
                Err(e)
            }
        }
    }
}
