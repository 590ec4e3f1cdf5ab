//! Assistant Reply Parsing
//!
//! Stateless extraction of either a terminal answer or an action request
//! from raw assistant text. Terminal detection always wins over action
//! extraction.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AgentError, Result};

/// Literal marker separating the assistant's reasoning from its final,
/// user-facing answer.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Literal marker that introduces tool output in the transcript. Passed to
/// the backend as a stop sequence so the model cannot hallucinate its own
/// observation text.
pub const OBSERVATION_MARKER: &str = "Observation:";

/// Literal marker that introduces recoverable failures in the transcript.
pub const ERROR_MARKER: &str = "Error:";

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Structured instruction to invoke a named tool with a payload.
///
/// Transient: parsed from one assistant turn, consumed by dispatch, never
/// stored. A reply whose JSON object lacks the `action` key still parses;
/// the unbound action resolves to "tool not found" at dispatch time.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ActionRequest {
    /// Tool name, absent when the model omitted the key
    #[serde(default)]
    pub action: Option<String>,

    /// Arbitrary payload, `Null` when omitted
    #[serde(default)]
    pub action_input: Value,
}

/// Outcome of parsing one assistant reply
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// Terminal answer, loop exits
    Final(String),
    /// Tool invocation, loop dispatches and continues
    Action(ActionRequest),
}

/// Parse an assistant reply into a terminal answer or an action request.
pub fn parse_reply(text: &str) -> Result<Reply> {
    if let Some(answer) = extract_final_answer(text) {
        return Ok(Reply::Final(answer));
    }
    extract_action(text).map(Reply::Action)
}

/// Extract the text after the *last* `Final Answer:` marker, trimmed.
pub fn extract_final_answer(text: &str) -> Option<String> {
    text.rfind(FINAL_ANSWER_MARKER)
        .map(|idx| text[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string())
}

/// Extract an [`ActionRequest`] from the *first* ```` ```json ```` fenced
/// block. Fails with [`AgentError::Parse`] when no block exists, the fence is
/// unterminated, or the content is not a single JSON object.
pub fn extract_action(text: &str) -> Result<ActionRequest> {
    let open = text.find(FENCE_OPEN).ok_or_else(|| {
        AgentError::Parse("no fenced JSON action block in assistant reply".into())
    })?;
    let body = &text[open + FENCE_OPEN.len()..];
    let close = body
        .find(FENCE_CLOSE)
        .ok_or_else(|| AgentError::Parse("unterminated fenced JSON action block".into()))?;
    let raw = body[..close].trim();

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AgentError::Parse(format!("invalid JSON in action block: {e}")))?;
    if !value.is_object() {
        return Err(AgentError::Parse(
            "action block must contain a single JSON object".into(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| AgentError::Parse(format!("malformed action request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_final_answer_trimmed() {
        let reply = parse_reply("Thought: I know this.\nFinal Answer:   Paris  \n").unwrap();
        assert_eq!(reply, Reply::Final("Paris".into()));
    }

    #[test]
    fn test_final_answer_last_occurrence_wins() {
        let text = "Final Answer: draft\nMore thinking.\nFinal Answer: final";
        assert_eq!(extract_final_answer(text), Some("final".into()));
    }

    #[test]
    fn test_terminal_beats_action_block() {
        let text = "```json\n{\"action\": \"calculator\", \"action_input\": \"1 + 1\"}\n```\nFinal Answer: 2";
        assert_eq!(parse_reply(text).unwrap(), Reply::Final("2".into()));
    }

    #[test]
    fn test_action_extraction() {
        let text = "I should look this up.\n```json\n{\"action\": \"search\", \"action_input\": {\"query\": \"rust\"}}\n```";
        let Reply::Action(request) = parse_reply(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(request.action.as_deref(), Some("search"));
        assert_eq!(request.action_input, json!({"query": "rust"}));
    }

    #[test]
    fn test_first_of_multiple_blocks_used() {
        let text = "```json\n{\"action\": \"first\"}\n```\n```json\n{\"action\": \"second\"}\n```";
        let request = extract_action(text).unwrap();
        assert_eq!(request.action.as_deref(), Some("first"));
    }

    #[test]
    fn test_missing_block_is_parse_error() {
        let err = parse_reply("I have no idea what to do.").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[test]
    fn test_unterminated_fence_is_parse_error() {
        let err = extract_action("```json\n{\"action\": \"x\"}").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[test]
    fn test_truncated_json_is_parse_error() {
        let err = extract_action("```json\n{\"action\": \"x\"\n```").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[test]
    fn test_non_object_is_parse_error() {
        let err = extract_action("```json\n[1, 2, 3]\n```").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[test]
    fn test_missing_action_key_parses() {
        let request = extract_action("```json\n{\"action_input\": \"2 + 2\"}\n```").unwrap();
        assert_eq!(request.action, None);
        assert_eq!(request.action_input, json!("2 + 2"));
    }

    #[test]
    fn test_missing_action_input_defaults_to_null() {
        let request = extract_action("```json\n{\"action\": \"calculator\"}\n```").unwrap();
        assert_eq!(request.action_input, Value::Null);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = "```json\n{\"action\": \"weather\", \"action_input\": {\"location\": \"Paris\"}}\n```";
        assert_eq!(extract_action(text).unwrap(), extract_action(text).unwrap());
    }
}
