//! Weather Service Integration
//!
//! Client abstraction over current-weather APIs, with an OpenWeather
//! implementation and a mock for tests and offline demos.

mod mock;

pub use mock::MockWeatherClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, ToolkitError};
use crate::model::WeatherReport;

/// Weather client trait (Strategy pattern)
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current conditions for a location query, e.g. "Paris" or "Tokyo,JP"
    async fn current(&self, location: &str) -> Result<WeatherReport>;

    /// Client name, for logging
    fn name(&self) -> &str;
}

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeather HTTP client. The API key is per-instance configuration.
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: OPENWEATHER_BASE_URL.into(),
        }
    }

    /// Override the API endpoint (for gateways and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current(&self, location: &str) -> Result<WeatherReport> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[
                ("q", location),
                ("appid", &self.api_key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ToolkitError::LocationNotFound(location.to_string()));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ToolkitError::Weather(format!(
                "request failed with {status}: {detail}"
            )));
        }

        let payload: OwmResponse = response.json().await?;
        let description = payload
            .weather
            .first()
            .map_or_else(|| "unknown conditions".into(), |c| c.description.clone());

        Ok(WeatherReport {
            location: location.to_string(),
            temp_celsius: payload.main.temp,
            description,
        })
    }

    fn name(&self) -> &str {
        "openweather"
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openweather_response_deserialization() {
        let raw = r#"{
            "coord": {"lon": 2.3488, "lat": 48.8534},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 15.3, "feels_like": 14.8, "pressure": 1021, "humidity": 62},
            "name": "Paris"
        }"#;

        let parsed: OwmResponse = serde_json::from_str(raw).unwrap();
        assert!((parsed.main.temp - 15.3).abs() < f64::EPSILON);
        assert_eq!(parsed.weather[0].description, "clear sky");
    }
}
