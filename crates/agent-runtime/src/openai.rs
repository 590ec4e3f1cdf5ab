//! OpenAI-Compatible Backend Provider
//!
//! Speaks the `/chat/completions` wire format, which many backends expose.
//! The credential is per-provider configuration passed at construction and is
//! sent as a bearer token; no process-global state is involved.

use agent_core::{
    ERROR_MARKER, OBSERVATION_MARKER,
    error::{AgentError, Result},
    message::{Role, Turn},
    provider::{Completion, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Base URL of the API, e.g. "https://api.openai.com/v1"
    pub base_url: String,

    /// Bearer credential; optional for unauthenticated local gateways
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
        }
    }
}

/// OpenAI-compatible backend provider
pub struct OpenAiProvider {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OpenAiConfig::from_env())
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    /// Convert transcript turns to the chat-completions wire format.
    /// Observation and error turns render as system context with their
    /// marker prefixes.
    fn convert_turns(turns: &[Turn]) -> Vec<WireMessage> {
        turns
            .iter()
            .map(|t| match t.role {
                Role::System => WireMessage::new("system", &t.content),
                Role::User => WireMessage::new("user", &t.content),
                Role::Assistant => WireMessage::new("assistant", &t.content),
                Role::Observation => WireMessage::new(
                    "system",
                    &format!("{OBSERVATION_MARKER} {}", t.content),
                ),
                Role::Error => {
                    WireMessage::new("system", &format!("{ERROR_MARKER} {}", t.content))
                }
            })
            .collect()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Completion> {
        let body = ChatRequest {
            model: &options.model,
            messages: Self::convert_turns(turns),
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_tokens,
            stop: &options.stop_sequences,
        };

        let response = self
            .request(reqwest::Method::POST, "chat/completions")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Backend(format!(
                "chat completion failed with {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Backend(format!("malformed completion response: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Backend("completion response had no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: parsed.model.unwrap_or_else(|| options.model.clone()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.request(reqwest::Method::GET, "models").send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("OpenAI-compatible health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "stop_is_empty")]
    stop: &'a [String],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn stop_is_empty(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl WireMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
