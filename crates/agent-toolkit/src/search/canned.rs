//! Canned Search Client
//!
//! Offline backend with a few fixed answers, for demos and tests.

use async_trait::async_trait;

use super::SearchClient;
use crate::error::Result;
use crate::model::SearchResult;

/// Search client answering a fixed set of queries
#[derive(Default)]
pub struct CannedSearchClient;

impl CannedSearchClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchClient for CannedSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.to_lowercase();

        if query.contains("capital of france") {
            return Ok(vec![SearchResult::new(
                "Paris",
                "https://en.wikipedia.org/wiki/Paris",
                "The capital of France is Paris.",
            )]);
        }

        if query.contains("bocchi the rock") {
            return Ok(vec![SearchResult::new(
                "Bocchi the Rock!",
                "https://en.wikipedia.org/wiki/Bocchi_the_Rock!",
                "Bocchi the Rock is a popular anime about a girl who struggles with \
                 social anxiety but finds friends through her band.",
            )]);
        }

        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
