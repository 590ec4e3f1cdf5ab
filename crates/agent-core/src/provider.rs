//! Model Backend Abstraction
//!
//! Defines a common interface for completion backends (Ollama, any
//! OpenAI-compatible endpoint, test stubs) so the agent loop never depends on
//! a specific wire format. Backend address and credential are per-provider
//! configuration passed at construction, never process-global state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Turn;
use crate::parser::OBSERVATION_MARKER;

/// Sampling parameters sent with every completion call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "llama3.2", "gpt-4o-mini")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences. Defaults to the observation marker so the backend
    /// stops before generating its own observation text.
    #[serde(default = "default_stop_sequences")]
    pub stop_sequences: Vec<String>,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_top_p() -> f32 {
    0.9
}
fn default_stop_sequences() -> Vec<String> {
    vec![OBSERVATION_MARKER.to_string()]
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: default_stop_sequences(),
        }
    }
}

/// Response from a completion call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if the backend reports them)
    pub usage: Option<TokenUsage>,
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Strategy trait for completion backends.
///
/// Implementations map the transcript to their wire format; observation and
/// error turns render as system-role context for backends without native
/// roles for them. Any transport or API failure surfaces as
/// [`crate::AgentError::Backend`], which the loop treats as fatal: no retry
/// happens inside the core.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a single text completion from the full transcript
    async fn complete(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Completion>;

    /// Check if the backend is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, 0.7);
        assert_eq!(opts.max_tokens, 2048);
        assert_eq!(opts.stop_sequences, vec![OBSERVATION_MARKER.to_string()]);
    }
}
