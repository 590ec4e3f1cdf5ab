//! Server Configuration
//!
//! All settings come from environment variables (loaded through dotenvy) and
//! an optional YAML prompt file; nothing is process-global.

use std::path::Path;

use agent_core::error::{AgentError, Result};
use agent_toolkit::ASSISTANT_PROMPT;
use serde::Deserialize;

/// Which backend provider to construct
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    OpenAi,
}

impl ProviderKind {
    fn parse(raw: &str) -> Result<Self> {
        match raw.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => Err(AgentError::Config(format!(
                "unknown provider '{other}' (expected 'ollama' or 'openai')"
            ))),
        }
    }
}

/// Server settings resolved at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Backend provider selection
    pub provider: ProviderKind,

    /// Model identifier passed to the provider
    pub model: String,

    /// Step budget per ask
    pub max_steps: usize,

    /// Seed system prompt
    pub system_prompt: String,

    /// OpenWeather API key; the weather tool falls back to the mock client
    /// when unset
    pub openweather_api_key: Option<String>,

    /// Google Custom Search credentials; the search tool falls back to the
    /// canned client when either is unset
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let provider = match std::env::var("AGENT_PROVIDER") {
            Ok(raw) => ProviderKind::parse(&raw)?,
            Err(_) => ProviderKind::Ollama,
        };

        let max_steps = match std::env::var("AGENT_MAX_STEPS") {
            Ok(raw) => raw.parse().map_err(|_| {
                AgentError::Config(format!("AGENT_MAX_STEPS must be a positive integer, got '{raw}'"))
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            provider,
            model: std::env::var("AGENT_MODEL").unwrap_or_else(|_| "llama3.2".into()),
            max_steps,
            system_prompt: load_system_prompt()?,
            openweather_api_key: std::env::var("OPENWEATHER_API_KEY").ok(),
            google_api_key: std::env::var("GOOGLE_API_KEY").ok(),
            google_cse_id: std::env::var("GOOGLE_CSE_ID").ok(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PromptsFile {
    system_prompt: String,
}

/// Load the system prompt from the YAML file named by `PROMPTS_FILE`
/// (default `prompts.yaml`), falling back to the built-in persona when the
/// file does not exist. A present-but-malformed file is a configuration
/// error, not a silent fallback.
fn load_system_prompt() -> Result<String> {
    let path = std::env::var("PROMPTS_FILE").unwrap_or_else(|_| "prompts.yaml".into());

    if !Path::new(&path).exists() {
        return Ok(ASSISTANT_PROMPT.to_string());
    }

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| AgentError::Config(format!("cannot read {path}: {e}")))?;
    let prompts: PromptsFile = serde_yaml::from_str(&raw)
        .map_err(|e| AgentError::Config(format!("malformed {path}: {e}")))?;

    Ok(prompts.system_prompt)
}
