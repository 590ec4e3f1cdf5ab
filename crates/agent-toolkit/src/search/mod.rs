//! Web Search Integration
//!
//! Client abstraction over search backends: Google Custom Search over HTTP,
//! and a canned offline backend for demos and tests.

mod canned;

pub use canned::CannedSearchClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, ToolkitError};
use crate::model::SearchResult;

/// Search client trait (Strategy pattern)
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a query, returning zero or more results
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;

    /// Client name, for logging
    fn name(&self) -> &str;
}

const GOOGLE_SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search HTTP client. API key and engine id are per-instance
/// configuration.
pub struct GoogleSearchClient {
    http: reqwest::Client,
    api_key: String,
    cse_id: String,
    base_url: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: impl Into<String>, cse_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            cse_id: cse_id.into(),
            base_url: GOOGLE_SEARCH_BASE_URL.into(),
        }
    }

    /// Override the API endpoint (for gateways and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchClient for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("key", &self.api_key), ("cx", &self.cse_id)])
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ToolkitError::Search(format!(
                "request failed with {status}: {detail}"
            )));
        }

        let payload: CseResponse = response.json().await?;

        Ok(payload
            .items
            .into_iter()
            .map(|item| SearchResult {
                title: item.title.unwrap_or_else(|| "No title".into()),
                link: item.link.unwrap_or_else(|| "No link".into()),
                snippet: item.snippet.unwrap_or_else(|| "No snippet".into()),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cse_response_deserialization() {
        let raw = r#"{
            "kind": "customsearch#search",
            "items": [
                {"title": "Rust", "link": "https://rust-lang.org", "snippet": "A systems language."},
                {"link": "https://example.com"}
            ]
        }"#;

        let parsed: CseResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].title.as_deref(), Some("Rust"));
        assert!(parsed.items[1].title.is_none());
    }

    #[test]
    fn test_cse_response_without_items() {
        let parsed: CseResponse = serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(parsed.items.is_empty());
    }
}
