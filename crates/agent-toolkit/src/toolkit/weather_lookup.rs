//! Weather Lookup Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolInput, ToolInputKind, ToolSchema, tool::ParameterSchema,
};

use crate::weather::WeatherClient;

/// Tool reporting current weather conditions for a location
pub struct WeatherTool {
    client: Arc<dyn WeatherClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "weather".into(),
            description: "Get the current weather for a location.".into(),
            input: ToolInputKind::Structured,
            parameters: vec![ParameterSchema {
                name: "location".into(),
                param_type: "string".into(),
                description: "City name, e.g. 'Paris' or 'Tokyo,JP'".into(),
                required: true,
            }],
        }
    }

    async fn run(&self, input: ToolInput) -> CoreResult<String> {
        let location = input.require_str("location")?;

        tracing::debug!(client = self.client.name(), location, "weather lookup");
        let report = self.client.current(location).await?;

        Ok(format!(
            "The current temperature in {} is {}°C with {}.",
            report.location, report.temp_celsius, report.description
        ))
    }
}

#[cfg(test)]
mod tests {
    use agent_core::AgentError;
    use serde_json::json;

    use super::*;
    use crate::weather::MockWeatherClient;

    fn tool() -> WeatherTool {
        WeatherTool::new(Arc::new(MockWeatherClient::new()))
    }

    #[tokio::test]
    async fn test_formats_report() {
        let input = ToolInput::coerce(&json!({"location": "Paris"}), ToolInputKind::Structured)
            .unwrap();

        let output = tool().run(input).await.unwrap();
        assert_eq!(
            output,
            "The current temperature in Paris is 15°C with clear sky."
        );
    }

    #[tokio::test]
    async fn test_missing_location_is_validation_error() {
        let input = ToolInput::coerce(&json!({}), ToolInputKind::Structured).unwrap();

        let err = tool().run(input).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }

    #[tokio::test]
    async fn test_unknown_location_is_execution_error() {
        let input = ToolInput::coerce(&json!({"location": "Atlantis"}), ToolInputKind::Structured)
            .unwrap();

        let err = tool().run(input).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(_)));
    }
}
