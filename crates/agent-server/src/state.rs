//! Application State

use std::sync::Arc;

use agent_core::{Agent, LlmProvider};
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The agent behind a mutex: the loop supports at most one in-flight ask
    /// per instance, so requests serialize here. The conversation persists
    /// across requests for the process lifetime.
    pub agent: Arc<Mutex<Agent>>,

    /// Provider handle for health checks
    pub provider: Arc<dyn LlmProvider>,
}
