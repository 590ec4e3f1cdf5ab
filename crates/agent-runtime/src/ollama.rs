//! Ollama Backend Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use agent_core::{
    ERROR_MARKER, OBSERVATION_MARKER,
    error::{AgentError, Result},
    message::{Role, Turn},
    provider::{Completion, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, ChatMessageResponse, MessageRole, request::ChatMessageRequest},
    models::ModelOptions as OllamaOptions,
};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost".into());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);

        Self { host, port }
    }
}

/// Ollama backend provider
pub struct OllamaProvider {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::from_config(OllamaConfig {
            host: host.into(),
            port,
        })
    }

    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Self {
        Self {
            client: Ollama::new(&config.host, config.port),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::from_config(OllamaConfig::default())
    }

    /// The configured endpoint, for logging
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Convert transcript turns to the Ollama chat format. Observation and
    /// error turns render as system context with their marker prefixes.
    fn convert_turns(turns: &[Turn]) -> Vec<ChatMessage> {
        turns
            .iter()
            .map(|t| match t.role {
                Role::System => ChatMessage::new(MessageRole::System, t.content.clone()),
                Role::User => ChatMessage::new(MessageRole::User, t.content.clone()),
                Role::Assistant => ChatMessage::new(MessageRole::Assistant, t.content.clone()),
                Role::Observation => ChatMessage::new(
                    MessageRole::System,
                    format!("{OBSERVATION_MARKER} {}", t.content),
                ),
                Role::Error => ChatMessage::new(
                    MessageRole::System,
                    format!("{ERROR_MARKER} {}", t.content),
                ),
            })
            .collect()
    }

    /// Convert an Ollama response to a completion
    fn convert_completion(response: ChatMessageResponse, model: &str) -> Completion {
        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage: response.final_data.as_ref().map(|d| TokenUsage {
                prompt_tokens: d.prompt_eval_count as u32,
                completion_tokens: d.eval_count as u32,
                total_tokens: (d.prompt_eval_count + d.eval_count) as u32,
            }),
        }
    }

    /// Build Ollama generation options, including stop sequences
    fn build_options(opts: &GenerationOptions) -> OllamaOptions {
        OllamaOptions::default()
            .temperature(opts.temperature)
            .top_p(opts.top_p)
            .num_predict(opts.max_tokens as i32)
            .stop(opts.stop_sequences.clone())
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Completion> {
        let messages = Self::convert_turns(turns);
        let ollama_options = Self::build_options(options);

        let request =
            ChatMessageRequest::new(options.model.clone(), messages).options(ollama_options);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AgentError::Backend(e.to_string()))?;

        Ok(Self::convert_completion(response, &options.model))
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
