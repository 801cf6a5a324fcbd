//! Claude-specific request and response types
//!
//! These types map directly to the Vertex AI Claude `rawPredict` schema.

use serde::{Deserialize, Serialize};

/// Request for a single (non-streaming) Claude prediction via Vertex AI
#[derive(Debug, Clone, Serialize)]
pub struct RawPredictRequest {
    /// Required API version for Vertex AI Claude
    pub anthropic_version: String,
    /// Maximum number of tokens to generate (required)
    pub max_tokens: u32,
    /// Array of messages in the conversation
    pub messages: Vec<ClaudeMessage>,
    /// System prompt (top-level field)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Available tools for the model to use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ClaudeTool>>,
    /// How the model may choose among tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ClaudeToolChoice>,
    /// Temperature (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A single message in the Claude conversation
#[derive(Debug, Clone, Serialize)]
pub struct ClaudeMessage {
    /// Role: "user" or "assistant"
    pub role: String,
    /// Plain text content
    pub content: String,
}

/// Tool definition for Claude
#[derive(Debug, Clone, Serialize)]
pub struct ClaudeTool {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input schema (JSON Schema)
    pub input_schema: serde_json::Value,
}

/// Tool choice object (`auto`, `any` or `none`)
#[derive(Debug, Clone, Serialize)]
pub struct ClaudeToolChoice {
    #[serde(rename = "type")]
    pub choice_type: String,
}

/// Full prediction response
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeResponse {
    /// Message ID
    pub id: String,
    /// Content blocks produced by the model
    #[serde(default)]
    pub content: Vec<ClaudeResponseBlock>,
    /// "end_turn", "tool_use", "max_tokens", ...
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<ClaudeUsage>,
}

/// A content block in a Claude response
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeResponseBlock {
    /// Text content
    Text { text: String },
    /// Tool use block (model invoking a tool)
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// Block types this client does not act on (e.g. thinking)
    #[serde(other)]
    Other,
}

/// Usage metadata
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClaudeUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Error envelope (`{"type": "error", "error": {...}}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeErrorEnvelope {
    pub error: ClaudeErrorData,
}

/// Error data
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeErrorData {
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
}
