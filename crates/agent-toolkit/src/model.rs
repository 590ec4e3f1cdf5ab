//! Domain Models

use serde::{Deserialize, Serialize};

/// A single web search result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,

    /// Result URL
    pub link: String,

    /// Short description of the result
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
        }
    }
}

/// Current weather conditions for one location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Resolved location name
    pub location: String,

    /// Temperature in degrees Celsius
    pub temp_celsius: f64,

    /// Condition description, e.g. "clear sky"
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_round_trips() {
        let result = SearchResult::new("Rust", "https://rust-lang.org", "A systems language");
        let json = serde_json::to_string(&result).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
