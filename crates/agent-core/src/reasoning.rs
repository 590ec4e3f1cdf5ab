//! Agent Loop
//!
//! Drives a chat session through bounded think → act → observe cycles: call
//! the model, parse the reply, dispatch a tool when one is requested, feed
//! the observation back, and stop on a final answer or the step budget.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Turn};
use crate::parser::{Reply, parse_reply};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::ToolRegistry;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum think/act cycles before giving up
    pub max_steps: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to the system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_steps: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant that reasons step by step.

When you need a tool, reply with a fenced JSON block in this exact format:
```json
{"action": "tool_name", "action_input": "argument or object"}
```

The tool output will be fed back to you as an observation. When you know the
answer, reply with a single line starting with:
Final Answer: <your answer>

Never write an observation yourself. Be concise and accurate."#;

/// The agent: owns its conversation, tool registry, and provider handle.
///
/// One `ask` call runs at a time; the `&mut self` receiver makes concurrent
/// calls on a single instance impossible. The conversation persists across
/// calls for the lifetime of the instance and is never truncated.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    conversation: Conversation,
}

impl Agent {
    /// Create a new agent. Seeds the conversation with the system prompt,
    /// extended with the registry's tool descriptions when configured.
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        let seed = build_system_prompt(&config, &tools);
        Self {
            provider,
            tools,
            config,
            conversation: Conversation::with_system_prompt(seed),
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run the agent on a user message with the configured step budget.
    pub async fn ask(&mut self, user_input: &str) -> Result<String> {
        let max_steps = self.config.max_steps;
        self.ask_with_budget(user_input, max_steps).await
    }

    /// Run the agent on a user message, bounded by `max_steps` cycles.
    ///
    /// Fails with [`AgentError::EmptyInput`] before any state change when the
    /// input is blank. Recoverable dispatch failures become error turns and
    /// the loop continues; parse and backend failures abort immediately.
    pub async fn ask_with_budget(&mut self, user_input: &str, max_steps: usize) -> Result<String> {
        if user_input.trim().is_empty() {
            return Err(AgentError::EmptyInput);
        }

        tracing::info!(input = %user_input, "user input");
        self.conversation.push(Turn::user(user_input));

        let mut steps = 0;
        while steps < max_steps {
            let completion = self
                .provider
                .complete(self.conversation.turns(), &self.config.generation)
                .await?;
            let reply_text = completion.content;
            tracing::debug!(reply = %reply_text, "assistant reply");
            self.conversation.push(Turn::assistant(&reply_text));

            match parse_reply(&reply_text)? {
                Reply::Final(answer) => {
                    tracing::info!(steps = steps + 1, "final answer detected");
                    return Ok(answer);
                }
                Reply::Action(request) => match self.tools.dispatch(&request).await {
                    Ok(observation) => {
                        tracing::debug!(
                            tool = request.action.as_deref().unwrap_or_default(),
                            observation = %observation,
                            "tool observation"
                        );
                        self.conversation.push(Turn::observation(observation));
                    }
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!(error = %e, "recoverable dispatch failure");
                        self.conversation.push(Turn::error(e.to_string()));
                    }
                    Err(e) => return Err(e),
                },
            }

            steps += 1;
        }

        Err(AgentError::StepBudget(max_steps))
    }

    /// The full transcript, for logging and inspection
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Build the seed system prompt including tool descriptions
fn build_system_prompt(config: &AgentConfig, tools: &ToolRegistry) -> String {
    let mut prompt = config.system_prompt.clone();

    if config.inject_tool_descriptions && !tools.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(&tools.generate_prompt_section());
    }

    prompt
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_steps(mut self, max: usize) -> Self {
        self.config.max_steps = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::message::Role;
    use crate::provider::Completion;
    use crate::tool::{CalculatorTool, Tool, ToolInput, ToolInputKind, ToolSchema};

    /// Scripted provider: pops replies in order, repeating the last one
    /// forever once the script runs out.
    struct StubProvider {
        replies: Vec<String>,
        cursor: Mutex<usize>,
    }

    impl StubProvider {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.iter().map(ToString::to_string).collect(),
                cursor: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn complete(
            &self,
            _turns: &[Turn],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            let mut cursor = self.cursor.lock().unwrap();
            let idx = (*cursor).min(self.replies.len() - 1);
            *cursor += 1;

            Ok(Completion {
                content: self.replies[idx].clone(),
                model: options.model.clone(),
                usage: None,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    /// Tool that counts how often it is dispatched.
    struct CountingTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "probe".into(),
                description: "Counts invocations".into(),
                input: ToolInputKind::Text,
                parameters: Vec::new(),
            }
        }

        async fn run(&self, _input: ToolInput) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("probed".into())
        }
    }

    /// Tool that always fails.
    struct FaultyTool;

    #[async_trait]
    impl Tool for FaultyTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "faulty".into(),
                description: "Always fails".into(),
                input: ToolInputKind::Text,
                parameters: Vec::new(),
            }
        }

        async fn run(&self, _input: ToolInput) -> Result<String> {
            Err(AgentError::ToolExecution("upstream unavailable".into()))
        }
    }

    fn agent_with(provider: Arc<dyn LlmProvider>, tools: ToolRegistry) -> Agent {
        Agent::new(provider, Arc::new(tools), AgentConfig::default())
    }

    #[tokio::test]
    async fn test_final_answer_returned_trimmed() {
        let provider = StubProvider::new(&["Thought: easy.\nFinal Answer:   42  "]);
        let mut agent = agent_with(provider, ToolRegistry::new());

        let answer = agent.ask("what is 6 * 7?").await.unwrap();
        assert_eq!(answer, "42");

        // system + user + one assistant turn: exactly one cycle consumed
        assert_eq!(agent.conversation().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_input_leaves_state_untouched() {
        let provider = StubProvider::new(&["Final Answer: unreachable"]);
        let mut agent = agent_with(provider, ToolRegistry::new());

        assert!(matches!(agent.ask("").await, Err(AgentError::EmptyInput)));
        assert!(matches!(agent.ask("   ").await, Err(AgentError::EmptyInput)));

        // still just the seed system turn
        assert_eq!(agent.conversation().len(), 1);
        assert_eq!(agent.conversation().turns()[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_unknown_action_exhausts_step_budget() {
        let provider =
            StubProvider::new(&["```json\n{\"action\": \"missing\", \"action_input\": \"x\"}\n```"]);
        let mut agent = agent_with(provider, ToolRegistry::new());

        let err = agent.ask_with_budget("do something", 3).await.unwrap_err();
        assert!(matches!(err, AgentError::StepBudget(3)));

        let error_turns = agent
            .conversation()
            .turns()
            .iter()
            .filter(|t| t.role == Role::Error)
            .count();
        assert_eq!(error_turns, 3);
    }

    #[tokio::test]
    async fn test_terminal_wins_over_action_block() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut tools = ToolRegistry::new();
        tools.register(CountingTool {
            calls: calls.clone(),
        });

        let provider = StubProvider::new(&[
            "```json\n{\"action\": \"probe\", \"action_input\": \"hi\"}\n```\nFinal Answer: done",
        ]);
        let mut agent = agent_with(provider, tools);

        assert_eq!(agent.ask("go").await.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_truncated_json_is_fatal() {
        let provider = StubProvider::new(&["```json\n{\"action\": \"x\"\n```"]);
        let mut agent = agent_with(provider, ToolRegistry::new());

        let err = agent.ask("go").await.unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));

        // assistant turn appended, but no observation for the broken reply
        assert!(
            agent
                .conversation()
                .turns()
                .iter()
                .all(|t| t.role != Role::Observation)
        );
    }

    #[tokio::test]
    async fn test_tool_cycle_then_final_answer() {
        let mut tools = ToolRegistry::new();
        tools.register(CalculatorTool);

        let provider = StubProvider::new(&[
            "```json\n{\"action\": \"calculator\", \"action_input\": \"2 + 2\"}\n```",
            "Final Answer: the result is 4",
        ]);
        let mut agent = agent_with(provider, tools);

        assert_eq!(agent.ask("2 + 2?").await.unwrap(), "the result is 4");

        let observation = agent
            .conversation()
            .turns()
            .iter()
            .find(|t| t.role == Role::Observation)
            .expect("observation turn");
        assert_eq!(observation.content, "4");
    }

    #[tokio::test]
    async fn test_tool_failure_feeds_back_as_error_turn() {
        let mut tools = ToolRegistry::new();
        tools.register(FaultyTool);

        let provider = StubProvider::new(&[
            "```json\n{\"action\": \"faulty\", \"action_input\": \"x\"}\n```",
            "Final Answer: giving up on the tool",
        ]);
        let mut agent = agent_with(provider, tools);

        assert_eq!(agent.ask("try it").await.unwrap(), "giving up on the tool");

        let error_turn = agent
            .conversation()
            .turns()
            .iter()
            .find(|t| t.role == Role::Error)
            .expect("error turn");
        assert!(error_turn.content.contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn test_builder_requires_provider() {
        assert!(matches!(
            AgentBuilder::new().build(),
            Err(AgentError::Config(_))
        ));
    }
}
