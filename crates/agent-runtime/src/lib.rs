//! # agent-runtime
//!
//! Backend providers for the agent loop.
//!
//! ## Providers
//!
//! - **Ollama** (default): local inference via the Ollama HTTP API
//! - **OpenAI** (feature `openai`): any OpenAI-compatible chat-completions
//!   endpoint, with a per-instance credential
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost", 11434);
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, Completion, GenerationOptions, LlmProvider, Result, Role, Turn,
};
