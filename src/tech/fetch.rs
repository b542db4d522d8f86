//! Homepage fetching for technology detection.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::HeaderMap;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{
    categorize_reqwest_error, LookupFailure, LookupOutcome, LookupSource,
};

/// A fetched page, reduced to what detection needs.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub status: u16,
    /// URL after redirects
    pub final_url: String,
    /// Lower-cased header names; repeated headers joined with ", "
    pub headers: HashMap<String, String>,
    /// Body, truncated to the size cap
    pub body: String,
}

impl FetchedPage {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Fetches `https://<domain>/`, falling back to `http://<domain>/`.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Arc<reqwest::Client>,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            max_body_bytes: MAX_RESPONSE_BODY_SIZE,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Any HTTP status is a successful fetch: error pages still carry the
    /// headers and markup detection looks at. Only a transport failure on
    /// both schemes is a failure.
    pub async fn fetch(&self, domain: &str) -> LookupOutcome<FetchedPage> {
        match self.fetch_url(&format!("https://{domain}/")).await {
            Ok(page) => Ok(page),
            Err(https_err) => {
                log::debug!("HTTPS fetch failed for {}: {}, trying HTTP", domain, https_err);
                self.fetch_url(&format!("http://{domain}/")).await
            }
        }
    }

    pub async fn fetch_url(&self, url: &str) -> LookupOutcome<FetchedPage> {
        let to_failure = |e: reqwest::Error| {
            LookupFailure::new(
                LookupSource::Technology,
                categorize_reqwest_error(&e),
                format!("{url}: {e}"),
            )
        };

        let mut response = self.client.get(url).send().await.map_err(to_failure)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = flatten_headers(response.headers());

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(to_failure)? {
            let room = self.max_body_bytes.saturating_sub(bytes.len());
            if chunk.len() >= room {
                bytes.extend_from_slice(&chunk[..room]);
                log::debug!("Truncated body of {} at {} bytes", final_url, self.max_body_bytes);
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedPage {
            status,
            final_url,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut flat: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else { continue };
        flat.entry(name.as_str().to_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    flat
}
