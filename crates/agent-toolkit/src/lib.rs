//! # agent-toolkit
//!
//! Weather and web-search capabilities for the agent loop, built as
//! `agent_core::Tool` implementations over swappable service clients.
//!
//! Each external service sits behind a client trait (`WeatherClient`,
//! `SearchClient`) with a real HTTP implementation and an offline one, so
//! the same tool works in production, demos, and tests.

pub mod error;
pub mod model;
pub mod search;
pub mod toolkit;
pub mod weather;

pub use error::{Result, ToolkitError};
pub use model::{SearchResult, WeatherReport};
pub use search::{CannedSearchClient, GoogleSearchClient, SearchClient};
pub use weather::{MockWeatherClient, OpenWeatherClient, WeatherClient};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::toolkit::{WeatherTool, WebSearchTool};
}

/// Default system prompt for the tool-using assistant agent
pub const ASSISTANT_PROMPT: &str = r#"You are a helpful assistant that reasons step by step and uses tools when they help.

## How to work

For every user request:

1. Think about what information you need.
2. When a tool can provide it, reply with exactly one fenced JSON block:
```json
{"action": "tool_name", "action_input": {"arg": "value"}}
```
3. Read the observation that comes back and decide the next step.
4. When you can answer, reply with a single line starting with:
Final Answer: <your answer>

## Rules

- Use the `calculator` tool for any arithmetic instead of computing yourself.
- Use the `weather` tool for current conditions; never guess the weather.
- Use the `search` tool for facts you are not sure about.
- Never write an observation yourself; wait for the real one.
- Keep the final answer short and direct."#;
