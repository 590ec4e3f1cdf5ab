//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
///
/// Each variant is either fatal (aborts the current `ask` call) or
/// recoverable (fed back into the conversation as an error turn so the model
/// can self-correct). [`AgentError::is_recoverable`] is the single source of
/// truth for that distinction.
#[derive(Error, Debug)]
pub enum AgentError {
    /// User input was blank or absent
    #[error("user input cannot be empty")]
    EmptyInput,

    /// Model backend call failed (network, auth, API error)
    #[error("backend error: {0}")]
    Backend(String),

    /// Assistant reply had neither a terminal marker nor valid fenced JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// Action name not in the tool registry
    #[error("tool '{0}' not found")]
    ToolNotFound(String),

    /// Action payload did not match the tool's declared input kind
    #[error("tool input validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("tool execution error: {0}")]
    ToolExecution(String),

    /// Step budget reached without a final answer
    #[error("step budget of {0} exhausted without a final answer")]
    StepBudget(usize),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Whether the agent loop can continue after this error by appending an
    /// error turn and giving the model another cycle.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgentError::ToolNotFound(_)
                | AgentError::ToolValidation(_)
                | AgentError::ToolExecution(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgentError::EmptyInput => "Please provide a non-empty message.".into(),
            AgentError::Backend(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            AgentError::Parse(_) => {
                "The assistant produced a reply that could not be interpreted.".into()
            }
            AgentError::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            AgentError::ToolValidation(msg) => format!("Invalid tool input: {msg}"),
            AgentError::ToolExecution(msg) => format!("Tool error: {msg}"),
            AgentError::StepBudget(_) => {
                "The request took too many steps to process. Please try a simpler query.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::ToolExecution(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(AgentError::ToolNotFound("x".into()).is_recoverable());
        assert!(AgentError::ToolValidation("bad".into()).is_recoverable());
        assert!(AgentError::ToolExecution("boom".into()).is_recoverable());

        assert!(!AgentError::EmptyInput.is_recoverable());
        assert!(!AgentError::Backend("down".into()).is_recoverable());
        assert!(!AgentError::Parse("garbage".into()).is_recoverable());
        assert!(!AgentError::StepBudget(10).is_recoverable());
    }
}
