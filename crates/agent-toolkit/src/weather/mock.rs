//! Mock Weather Client
//!
//! For testing and offline demos. Returns static conditions for a handful of
//! cities.

use async_trait::async_trait;

use super::WeatherClient;
use crate::error::{Result, ToolkitError};
use crate::model::WeatherReport;

/// Mock weather client with canned conditions
#[derive(Default)]
pub struct MockWeatherClient;

impl MockWeatherClient {
    pub fn new() -> Self {
        Self
    }

    fn conditions(location: &str) -> Option<(f64, &'static str)> {
        match location.to_lowercase().as_str() {
            "paris" => Some((15.0, "clear sky")),
            "london" => Some((11.0, "light rain")),
            "tokyo" => Some((22.0, "scattered clouds")),
            "new york" => Some((18.0, "few clouds")),
            _ => None,
        }
    }
}

#[async_trait]
impl WeatherClient for MockWeatherClient {
    async fn current(&self, location: &str) -> Result<WeatherReport> {
        let (temp_celsius, description) = Self::conditions(location)
            .ok_or_else(|| ToolkitError::LocationNotFound(location.to_string()))?;

        Ok(WeatherReport {
            location: location.to_string(),
            temp_celsius,
            description: description.to_string(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_city() {
        let client = MockWeatherClient::new();
        let report = client.current("Paris").await.unwrap();
        assert_eq!(report.location, "Paris");
        assert_eq!(report.description, "clear sky");
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let client = MockWeatherClient::new();
        let err = client.current("Atlantis").await.unwrap_err();
        assert!(matches!(err, ToolkitError::LocationNotFound(_)));
    }
}
