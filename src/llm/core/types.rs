//! Core types for the LLM abstraction layer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::GenerationConfig;
use crate::llm::claude::ClaudeModel;
use crate::llm::groq::GroqModel;

/// Request asking the model whether, and how, to call a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation so far (a single user message for a support turn)
    pub messages: Vec<Message>,
    /// Available tools the model can call
    pub tools: Option<Vec<ToolDeclaration>>,
    /// How the model may pick among `tools`
    #[serde(default)]
    pub tool_choice: ToolChoice,
    /// Generation parameters
    pub config: GenerationConfig,
    /// System prompt/instructions
    pub system: Option<String>,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl Message {
    /// Create a new user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Human input
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
        }
    }
}

/// Tool selection policy sent to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides between text and a tool call
    #[default]
    Auto,
    /// Model must answer in text
    None,
    /// Model must call a tool
    Required,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::None => "none",
            ToolChoice::Required => "required",
        }
    }
}

/// Declaration of a tool available to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Function name
    pub name: String,
    /// What the tool does, including extraction hints for the model
    pub description: String,
    /// JSON Schema for parameters
    pub parameters: Value,
}

/// One tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id
    pub id: String,
    /// Name of the tool to run
    pub name: String,
    /// Raw JSON arguments as produced by the model
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the raw arguments as a JSON object.
    ///
    /// Anything other than a JSON object (including an empty string) is an error.
    pub fn parse_arguments(&self) -> Result<Map<String, Value>, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

/// What the model decided to do with a turn
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Plain text answer, no tool needed
    DirectText(String),
    /// One or more tool calls, in the order the model emitted them (never empty)
    ToolCalls(Vec<ToolCall>),
}

impl Decision {
    /// Build a decision from the pieces a provider returns.
    ///
    /// Tool calls win over text; a response with neither is an error.
    pub fn from_parts(
        text: Option<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Result<Self, super::error::LlmError> {
        if !tool_calls.is_empty() {
            return Ok(Decision::ToolCalls(tool_calls));
        }
        match text {
            Some(text) => Ok(Decision::DirectText(text)),
            None => Err(super::error::LlmError::EmptyResponse),
        }
    }

    /// The tool call to honour for this turn, if any
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        match self {
            Decision::DirectText(_) => None,
            Decision::ToolCalls(calls) => calls.first(),
        }
    }
}

/// Unified model enum for all supported LLM providers
#[derive(Debug, Clone)]
pub enum Model {
    /// OpenAI-compatible model served by Groq
    Groq(GroqModel),
    /// Anthropic Claude model on Vertex AI
    Claude(ClaudeModel),
}

impl Model {
    /// Get the model identifier as a string
    pub fn as_str(&self) -> &str {
        match self {
            Model::Groq(model) => model.as_str(),
            Model::Claude(model) => model.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::error::LlmError;

    #[test]
    fn test_message_user_constructor() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_tool_choice_default_is_auto() {
        assert_eq!(ToolChoice::default(), ToolChoice::Auto);
        assert_eq!(serde_json::to_string(&ToolChoice::Auto).unwrap(), "\"auto\"");
    }

    #[test]
    fn test_parse_arguments_object() {
        let call = ToolCall::new("call_1", "get_identity_info", r#"{"user_id":"Ram"}"#);
        let args = call.parse_arguments().unwrap();
        assert_eq!(args["user_id"], "Ram");
    }

    #[test]
    fn test_parse_arguments_rejects_malformed_json() {
        let call = ToolCall::new("call_1", "get_identity_info", r#"{"user_id": "Ram""#);
        assert!(call.parse_arguments().is_err());
    }

    #[test]
    fn test_parse_arguments_rejects_non_object() {
        let call = ToolCall::new("call_1", "get_identity_info", r#"["Ram"]"#);
        assert!(call.parse_arguments().is_err());
    }

    #[test]
    fn test_decision_prefers_tool_calls() {
        let decision = Decision::from_parts(
            Some("I'll refresh that".to_string()),
            vec![ToolCall::new("1", "trigger_identity_refresh", "{}")],
        )
        .unwrap();
        assert_eq!(
            decision.first_tool_call().map(|c| c.name.as_str()),
            Some("trigger_identity_refresh")
        );
    }

    #[test]
    fn test_decision_text_only() {
        let decision = Decision::from_parts(Some("Hello".to_string()), vec![]).unwrap();
        assert_eq!(decision, Decision::DirectText("Hello".to_string()));
        assert!(decision.first_tool_call().is_none());
    }

    #[test]
    fn test_decision_empty_is_error() {
        let err = Decision::from_parts(None, vec![]).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
