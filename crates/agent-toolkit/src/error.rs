//! Error Types for the Toolkit

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolkitError>;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("weather API error: {0}")]
    Weather(String),

    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("search API error: {0}")]
    Search(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Toolkit failures surface to the agent loop as recoverable tool-execution
/// errors, so the model gets a chance to adjust.
impl From<ToolkitError> for AgentError {
    fn from(err: ToolkitError) -> Self {
        AgentError::ToolExecution(err.to_string())
    }
}
