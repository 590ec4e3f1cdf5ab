//! Conversation Turns
//!
//! The ordered, append-only transcript replayed to the model on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a turn in the transcript
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool output fed back as context
    Observation,
    /// Recoverable failure fed back as context
    Error,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Observation => write!(f, "observation"),
            Role::Error => write!(f, "error"),
        }
    }
}

/// A single turn in a conversation, immutable once appended
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    /// Turn role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an observation turn carrying a tool result
    pub fn observation(content: impl Into<String>) -> Self {
        Self::new(Role::Observation, content)
    }

    /// Create an error turn carrying a recoverable failure message
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Error, content)
    }
}

/// Conversation history: ordered, append-only, seeded with one system turn.
///
/// The core never truncates, reorders, or summarizes; growth is unbounded for
/// the lifetime of the owning agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create a conversation seeded with the given system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(prompt)],
        }
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Full ordered transcript, seed system turn first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get the last turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty (never true for a seeded conversation)
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
