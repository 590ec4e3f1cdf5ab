//! # agent-core
//!
//! Bounded agent loop with provider-agnostic LLM abstraction, reply parsing,
//! and an extensible tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Agent                                │
//! │  ┌──────────┐  ┌────────┐  ┌──────────┐  ┌───────────────┐  │
//! │  │  Agent   │──│ Reply  │──│   Tool   │──│  LlmProvider  │  │
//! │  │  Loop    │  │ Parser │  │ Registry │  │  (Strategy)   │  │
//! │  └──────────┘  └────────┘  └──────────┘  └───────────────┘  │
//! │        │                                                     │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ Conversation (append-only transcript, one system seed) │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop repeats think → act → observe cycles: call the provider on the
//! full transcript, parse the reply, dispatch a tool when one is requested,
//! append the observation, and stop on a `Final Answer:` or the step budget.
//! The `LlmProvider` trait enables swapping between Ollama, OpenAI-compatible
//! endpoints, or test stubs without changing agent logic.

pub mod error;
pub mod message;
pub mod parser;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Conversation, Role, Turn};
pub use parser::{
    ActionRequest, ERROR_MARKER, FINAL_ANSWER_MARKER, OBSERVATION_MARKER, Reply, parse_reply,
};
pub use provider::{Completion, GenerationOptions, LlmProvider, TokenUsage};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use tool::{
    CalculatorTool, ParameterSchema, Tool, ToolInput, ToolInputKind, ToolRegistry, ToolSchema,
};
