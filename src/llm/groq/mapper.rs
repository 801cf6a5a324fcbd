//! Mapping between abstraction types and Groq-specific types

use crate::llm::core::error::{from_status, LlmError};
use crate::llm::core::types::{Decision, GenerateRequest, Message, ToolCall, ToolDeclaration};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatFunction, ChatMessage, ChatTool,
    ErrorEnvelope,
};

/// Convert our abstraction request to Groq's request format
pub fn to_groq_request(request: GenerateRequest, model: &str) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system,
        });
    }
    messages.extend(request.messages.into_iter().map(to_groq_message));

    // tool_choice is only meaningful when tools are offered
    let tools: Option<Vec<ChatTool>> = request
        .tools
        .filter(|tools| !tools.is_empty())
        .map(|tools| tools.into_iter().map(to_groq_tool).collect());
    let tool_choice = tools
        .as_ref()
        .map(|_| request.tool_choice.as_str().to_string());

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        tools,
        tool_choice,
        temperature: request.config.temperature,
        max_tokens: request.config.max_tokens,
    }
}

fn to_groq_message(message: Message) -> ChatMessage {
    ChatMessage {
        role: message.role.as_str().to_string(),
        content: message.content,
    }
}

fn to_groq_tool(tool: ToolDeclaration) -> ChatTool {
    ChatTool {
        tool_type: "function".to_string(),
        function: ChatFunction {
            name: tool.name,
            description: tool.description,
            parameters: tool.parameters,
        },
    }
}

/// Convert the first choice of a Groq response into a decision
pub fn from_groq_response(response: ChatCompletionResponse) -> Result<Decision, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
        .collect();

    Decision::from_parts(choice.message.content, tool_calls)
}

/// Turn a non-2xx Groq response into an `LlmError`
///
/// Groq wraps failures in `{"error": {...}}`; when the body has that shape the
/// provider's own code and message are surfaced.
pub fn error_from_response(status: u16, retry_after: Option<&str>, body: String) -> LlmError {
    if status == 429 {
        return from_status(status, retry_after, body);
    }
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => LlmError::ProviderError {
            code: envelope
                .error
                .code
                .or(envelope.error.error_type)
                .unwrap_or_else(|| status.to_string()),
            message: envelope.error.message,
        },
        Err(_) => from_status(status, retry_after, body),
    }
}
