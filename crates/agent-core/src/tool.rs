//! Tool System
//!
//! Extensible tool framework for agent capabilities. Tools are registered at
//! runtime and invoked by the agent loop through [`ToolRegistry::dispatch`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::parser::ActionRequest;

/// Payload variant a tool declares to accept
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolInputKind {
    /// A single text argument
    Text,
    /// A JSON object of named arguments
    Structured,
}

/// Validated, coerced payload handed to a tool's `run`
#[derive(Clone, Debug, PartialEq)]
pub enum ToolInput {
    Text(String),
    Structured(serde_json::Map<String, Value>),
}

impl ToolInput {
    /// Coerce a raw `action_input` value into the kind a tool declares.
    ///
    /// Scalars coerce to their text form for `Text` tools; a missing payload
    /// coerces to the empty string. `Structured` tools require an object.
    pub fn coerce(raw: &Value, kind: ToolInputKind) -> Result<Self> {
        match (kind, raw) {
            (ToolInputKind::Text, Value::Null) => Ok(Self::Text(String::new())),
            (ToolInputKind::Text, Value::String(s)) => Ok(Self::Text(s.clone())),
            (ToolInputKind::Text, Value::Number(n)) => Ok(Self::Text(n.to_string())),
            (ToolInputKind::Text, Value::Bool(b)) => Ok(Self::Text(b.to_string())),
            (ToolInputKind::Text, other) => Err(AgentError::ToolValidation(format!(
                "expected a text payload, got {}",
                json_kind(other)
            ))),
            (ToolInputKind::Structured, Value::Object(map)) => Ok(Self::Structured(map.clone())),
            (ToolInputKind::Structured, other) => Err(AgentError::ToolValidation(format!(
                "expected an object payload, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Text payload, if this is the `Text` variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Structured(_) => None,
        }
    }

    /// Object payload, if this is the `Structured` variant
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            Self::Text(_) => None,
            Self::Structured(map) => Some(map),
        }
    }

    /// Fetch a required string field from a structured payload.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.as_object()
            .and_then(|map| map.get(key))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AgentError::ToolValidation(format!("missing required string argument '{key}'"))
            })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

/// Tool definition schema, rendered into the system prompt
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the LLM)
    pub description: String,

    /// Payload variant the tool accepts; dispatch coerces before calling
    pub input: ToolInputKind,

    /// Parameter definitions (for `Structured` tools)
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's schema, including its declared input kind
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with a coerced payload, returning its output text
    async fn run(&self, input: ToolInput) -> Result<String>;
}

/// Registry for available tools.
///
/// Registering a second tool under an existing name silently overwrites the
/// first: last registration wins. This is a deliberate, tested contract.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool (last registration wins on duplicate names)
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Resolve an action request, coerce its payload, and run the tool.
    ///
    /// An unknown (or absent) action name fails with
    /// [`AgentError::ToolNotFound`]; a payload that does not match the tool's
    /// declared input kind fails with [`AgentError::ToolValidation`]; a
    /// failure inside the tool propagates untouched. All three are
    /// recoverable from the loop's point of view.
    pub async fn dispatch(&self, request: &ActionRequest) -> Result<String> {
        let name = request.action.clone().unwrap_or_default();
        let tool = self
            .get(&name)
            .ok_or_else(|| AgentError::ToolNotFound(name.clone()))?;

        let input = ToolInput::coerce(&request.action_input, tool.schema().input)?;
        tool.run(input).await
    }

    /// Get all tool schemas (for system prompt generation)
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate the system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("Invoke a tool by replying with a fenced JSON block:\n\n");
        prompt.push_str("```json\n{\"action\": \"tool_name\", \"action_input\": {\"arg\": \"value\"}}\n```\n\n");
        prompt.push_str(
            "Tools that take a single text argument expect `action_input` to be a string.\n\n",
        );

        for schema in self.schemas() {
            prompt.push_str(&format!("### {}\n", schema.name));
            prompt.push_str(&format!("{}\n", schema.description));

            match schema.input {
                ToolInputKind::Text => {
                    prompt.push_str("Input: a single text argument.\n");
                }
                ToolInputKind::Structured => {
                    prompt.push_str("Input: an object with these arguments:\n");
                    for param in &schema.parameters {
                        let required = if param.required { " (required)" } else { "" };
                        prompt.push_str(&format!(
                            "- `{}` ({}){}: {}\n",
                            param.name, param.param_type, required, param.description
                        ));
                    }
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// Calculator tool - evaluates arithmetic expressions
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculator".into(),
            description: "Evaluate an arithmetic expression, e.g. '2 + 2' or '3 * (4 - 1)'."
                .into(),
            input: ToolInputKind::Text,
            parameters: Vec::new(),
        }
    }

    async fn run(&self, input: ToolInput) -> Result<String> {
        let expr = input
            .as_text()
            .ok_or_else(|| AgentError::ToolValidation("expected an expression string".into()))?;

        let result = evaluate_expression(expr)
            .map_err(|e| AgentError::ToolExecution(format!("calculation failed: {e}")))?;

        Ok(result.to_string())
    }
}

/// Recursive-descent evaluator for `+ - * / ^` and parentheses
fn evaluate_expression(expr: &str) -> std::result::Result<f64, String> {
    let expr = expr.replace(' ', "");
    if expr.is_empty() {
        return Err("empty expression".into());
    }

    // Innermost parentheses first
    if let Some(start) = expr.rfind('(') {
        if let Some(end) = expr[start..].find(')') {
            let inner = &expr[start + 1..start + end];
            let inner_result = evaluate_expression(inner)?;
            let new_expr = format!(
                "{}{}{}",
                &expr[..start],
                inner_result,
                &expr[start + end + 1..]
            );
            return evaluate_expression(&new_expr);
        }
        return Err("unbalanced parentheses".into());
    }

    // Addition/subtraction (lowest precedence, evaluated last)
    for (i, c) in expr.char_indices().rev() {
        if i > 0 && (c == '+' || c == '-') {
            // Skip unary signs
            let prev_char = expr.as_bytes()[i - 1] as char;
            if prev_char.is_ascii_digit() || prev_char == ')' {
                let left = evaluate_expression(&expr[..i])?;
                let right = evaluate_expression(&expr[i + 1..])?;
                return Ok(if c == '+' { left + right } else { left - right });
            }
        }
    }

    // Multiplication/division
    for (i, c) in expr.char_indices().rev() {
        if c == '*' || c == '/' {
            let left = evaluate_expression(&expr[..i])?;
            let right = evaluate_expression(&expr[i + 1..])?;
            if c == '/' && right == 0.0 {
                return Err("division by zero".into());
            }
            return Ok(if c == '*' { left * right } else { left / right });
        }
    }

    // Power
    if let Some(i) = expr.find('^') {
        let left = evaluate_expression(&expr[..i])?;
        let right = evaluate_expression(&expr[i + 1..])?;
        return Ok(left.powf(right));
    }

    expr.parse::<f64>().map_err(|e| format!("parse error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool {
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo a fixed reply".into(),
                input: ToolInputKind::Text,
                parameters: Vec::new(),
            }
        }

        async fn run(&self, _input: ToolInput) -> Result<String> {
            Ok(self.reply.to_string())
        }
    }

    #[test]
    fn test_expression_evaluator() {
        assert!((evaluate_expression("2 + 2").unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("10 * 5").unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("(2 + 3) * 4").unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("2 ^ 8").unwrap() - 256.0).abs() < f64::EPSILON);
        assert!(evaluate_expression("1 / 0").is_err());
        assert!(evaluate_expression("").is_err());
    }

    #[test]
    fn test_input_coercion() {
        let text = ToolInput::coerce(&json!("2 + 2"), ToolInputKind::Text).unwrap();
        assert_eq!(text, ToolInput::Text("2 + 2".into()));

        let number = ToolInput::coerce(&json!(7), ToolInputKind::Text).unwrap();
        assert_eq!(number, ToolInput::Text("7".into()));

        let absent = ToolInput::coerce(&Value::Null, ToolInputKind::Text).unwrap();
        assert_eq!(absent, ToolInput::Text(String::new()));

        let object = ToolInput::coerce(&json!({"q": "rust"}), ToolInputKind::Structured).unwrap();
        assert_eq!(object.require_str("q").unwrap(), "rust");

        assert!(matches!(
            ToolInput::coerce(&json!({"q": "rust"}), ToolInputKind::Text),
            Err(AgentError::ToolValidation(_))
        ));
        assert!(matches!(
            ToolInput::coerce(&json!("rust"), ToolInputKind::Structured),
            Err(AgentError::ToolValidation(_))
        ));
    }

    #[tokio::test]
    async fn test_calculator_round_trip() {
        let mut registry = ToolRegistry::new();
        registry.register(CalculatorTool);

        let request: ActionRequest = serde_json::from_value(json!({
            "action": "calculator",
            "action_input": "3 * (4 - 1)",
        }))
        .unwrap();

        assert_eq!(registry.dispatch(&request).await.unwrap(), "9");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let request: ActionRequest =
            serde_json::from_value(json!({"action": "nope", "action_input": "x"})).unwrap();

        let err = registry.dispatch(&request).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_dispatch_missing_action_key() {
        let mut registry = ToolRegistry::new();
        registry.register(CalculatorTool);

        let request: ActionRequest =
            serde_json::from_value(json!({"action_input": "2 + 2"})).unwrap();

        let err = registry.dispatch(&request).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name.is_empty()));
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool { reply: "first" });
        registry.register(EchoTool { reply: "second" });

        assert_eq!(registry.len(), 1);

        let request: ActionRequest =
            serde_json::from_value(json!({"action": "echo", "action_input": ""})).unwrap();
        assert_eq!(registry.dispatch(&request).await.unwrap(), "second");
    }

    #[test]
    fn test_prompt_section_lists_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(CalculatorTool);

        let section = registry.generate_prompt_section();
        assert!(section.contains("### calculator"));
        assert!(section.contains("```json"));
    }
}
