//! Mapping between abstraction types and Claude-specific types

use crate::llm::core::error::{from_status, LlmError};
use crate::llm::core::types::{
    Decision, GenerateRequest, Message, ToolCall, ToolChoice, ToolDeclaration,
};

use super::types::{
    ClaudeErrorEnvelope, ClaudeMessage, ClaudeResponse, ClaudeResponseBlock, ClaudeTool,
    ClaudeToolChoice, RawPredictRequest,
};

/// Convert our abstraction request to Claude's request format
pub fn to_claude_request(request: GenerateRequest) -> RawPredictRequest {
    let tools: Option<Vec<ClaudeTool>> = request
        .tools
        .filter(|tools| !tools.is_empty())
        .map(|tools| tools.into_iter().map(to_claude_tool).collect());
    let tool_choice = tools.as_ref().map(|_| to_claude_tool_choice(request.tool_choice));

    RawPredictRequest {
        anthropic_version: "vertex-2023-10-16".to_string(),
        max_tokens: request.config.max_tokens,
        messages: request
            .messages
            .into_iter()
            .map(to_claude_message)
            .collect(),
        system: request.system,
        tools,
        tool_choice,
        temperature: request.config.temperature,
    }
}

/// Convert our Message to Claude's ClaudeMessage
fn to_claude_message(message: Message) -> ClaudeMessage {
    ClaudeMessage {
        role: message.role.as_str().to_string(),
        content: message.content,
    }
}

/// Convert our ToolDeclaration to Claude's ClaudeTool
fn to_claude_tool(tool: ToolDeclaration) -> ClaudeTool {
    ClaudeTool {
        name: tool.name,
        description: tool.description,
        input_schema: tool.parameters,
    }
}

fn to_claude_tool_choice(choice: ToolChoice) -> ClaudeToolChoice {
    let choice_type = match choice {
        ToolChoice::Auto => "auto",
        ToolChoice::None => "none",
        // Claude calls "must use some tool" `any`
        ToolChoice::Required => "any",
    };
    ClaudeToolChoice {
        choice_type: choice_type.to_string(),
    }
}

/// Convert Claude's response to a decision
///
/// Text blocks are concatenated; tool_use inputs are re-serialized so every
/// provider hands the dispatcher arguments as a JSON string.
pub fn from_claude_response(response: ClaudeResponse) -> Result<Decision, LlmError> {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in response.content {
        match block {
            ClaudeResponseBlock::Text { text: t } => text.push_str(&t),
            ClaudeResponseBlock::ToolUse { id, name, input } => {
                tool_calls.push(ToolCall::new(id, name, input.to_string()));
            }
            ClaudeResponseBlock::Other => {}
        }
    }

    let text = if text.is_empty() { None } else { Some(text) };
    Decision::from_parts(text, tool_calls)
}

/// Turn a non-2xx Vertex response into an `LlmError`
pub fn error_from_response(status: u16, retry_after: Option<&str>, body: String) -> LlmError {
    if status == 429 {
        return from_status(status, retry_after, body);
    }
    match serde_json::from_str::<ClaudeErrorEnvelope>(&body) {
        Ok(envelope) => LlmError::ProviderError {
            code: envelope.error.error_type,
            message: envelope.error.message,
        },
        Err(_) => from_status(status, retry_after, body),
    }
}
