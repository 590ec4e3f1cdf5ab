//! Web Search Tool

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolInput, ToolInputKind, ToolSchema, tool::ParameterSchema,
};

use crate::search::SearchClient;

/// Tool running a web search and summarizing the hits
pub struct WebSearchTool {
    client: Arc<dyn SearchClient>,
}

impl WebSearchTool {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search".into(),
            description: "Search the web and return titled results with snippets.".into(),
            input: ToolInputKind::Structured,
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "The search query".into(),
                required: true,
            }],
        }
    }

    async fn run(&self, input: ToolInput) -> CoreResult<String> {
        let query = input.require_str("query")?;

        tracing::debug!(client = self.client.name(), query, "web search");
        let results = self.client.search(query).await?;

        if results.is_empty() {
            return Ok("No results found for your query.".into());
        }

        let mut output = String::new();
        for (i, result) in results.iter().enumerate() {
            let _ = writeln!(output, "{}. {} ({})", i + 1, result.title, result.link);
            let _ = writeln!(output, "   {}", result.snippet);
        }

        Ok(output.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::search::CannedSearchClient;

    fn tool() -> WebSearchTool {
        WebSearchTool::new(Arc::new(CannedSearchClient::new()))
    }

    #[tokio::test]
    async fn test_formats_results() {
        let input = ToolInput::coerce(
            &json!({"query": "capital of France"}),
            ToolInputKind::Structured,
        )
        .unwrap();

        let output = tool().run(input).await.unwrap();
        assert!(output.starts_with("1. Paris"));
        assert!(output.contains("The capital of France is Paris."));
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let input = ToolInput::coerce(
            &json!({"query": "weather on Mars"}),
            ToolInputKind::Structured,
        )
        .unwrap();

        assert_eq!(
            tool().run(input).await.unwrap(),
            "No results found for your query."
        );
    }
}
