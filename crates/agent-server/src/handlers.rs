//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use agent_core::AgentError;

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
    #[serde(default)]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend_connected,
    })
}

/// Main ask endpoint: runs the bounded agent loop on the user message
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut agent = state.agent.lock().await;

    let result = match payload.max_steps {
        Some(budget) => agent.ask_with_budget(&payload.message, budget).await,
        None => agent.ask(&payload.message).await,
    };

    let answer = result.map_err(|e| {
        tracing::error!("agent error: {}", e);
        let status = match e {
            AgentError::EmptyInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: e.user_message(),
                code: error_code(&e).into(),
            }),
        )
    })?;

    Ok(Json(AskResponse {
        answer,
        model: agent.config().generation.model.clone(),
    }))
}

fn error_code(err: &AgentError) -> &'static str {
    match err {
        AgentError::EmptyInput => "EMPTY_INPUT",
        AgentError::Backend(_) => "BACKEND_ERROR",
        AgentError::Parse(_) => "PARSE_ERROR",
        AgentError::StepBudget(_) => "STEP_BUDGET_EXCEEDED",
        _ => "AGENT_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(&AgentError::EmptyInput), "EMPTY_INPUT");
        assert_eq!(error_code(&AgentError::StepBudget(10)), "STEP_BUDGET_EXCEEDED");
        assert_eq!(error_code(&AgentError::Config("x".into())), "AGENT_ERROR");
    }
}
