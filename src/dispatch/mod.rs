//! Single-turn chat dispatch
//!
//! Each chat message is one turn with no memory of earlier turns:
//! - Sends the system prompt, the tool catalog and the user message to the LLM
//! - Runs the first tool call the model asks for, if any
//! - Formats the tool result (or passes the model's text through) as the reply

pub mod catalog;
mod error;
pub mod prompt;

pub use catalog::{build_registry, ActionTaken, ToolReply};
pub use error::DispatchError;

use serde_json::{Map, Value};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::llm::tools::{ToolError, ToolExecutor};
use crate::llm::{
    Decision, GenerateRequest, GenerationConfig, LlmError, LlmProvider, Message, ToolChoice,
};

/// Outcome of a chat turn
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub action_taken: Option<ActionTaken>,
}

impl From<ToolReply> for ChatReply {
    fn from(reply: ToolReply) -> Self {
        Self {
            text: reply.text,
            action_taken: reply.action_taken,
        }
    }
}

/// Routes chat messages through the LLM to the support tools
pub struct Dispatcher {
    /// LLM provider (Groq or Claude)
    provider: Box<dyn LlmProvider>,

    /// Tool catalog the model may call into
    tools: Box<dyn ToolExecutor<Output = ToolReply>>,

    config: GenerationConfig,

    system: String,
}

impl Dispatcher {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        tools: Box<dyn ToolExecutor<Output = ToolReply>>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
            system: prompt::SYSTEM_PROMPT.to_string(),
        }
    }

    /// Names of the tools offered to the model
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.declarations().into_iter().map(|d| d.name).collect()
    }

    /// Handle one chat message
    ///
    /// `user_id` is the caller's id; it fills in `user_id` when the model
    /// calls a tool without one.
    ///
    /// # Errors
    ///
    /// LLM failures and unusable tool arguments. An unknown tool name is not an
    /// error; it produces a "not recognized" reply.
    pub async fn handle(&self, message: &str, user_id: &str) -> Result<ChatReply, DispatchError> {
        let turn_id = Uuid::new_v4();
        let span = tracing::info_span!("chat_turn", %turn_id, user_id);
        self.run_turn(message, user_id).instrument(span).await
    }

    async fn run_turn(&self, message: &str, user_id: &str) -> Result<ChatReply, DispatchError> {
        info!(message_len = message.len(), "processing chat message");

        let request = GenerateRequest {
            messages: vec![Message::user(message)],
            tools: Some(self.tools.declarations()),
            tool_choice: ToolChoice::Auto,
            config: self.config.clone(),
            system: Some(self.system.clone()),
        };

        let decision = self.provider.decide(request).await?;
        if let Decision::DirectText(text) = decision {
            info!(action_taken = "none", response_len = text.len(), "no tool call needed");
            return Ok(ChatReply {
                text,
                action_taken: None,
            });
        }

        let Some(call) = decision.first_tool_call() else {
            return Err(DispatchError::Llm(LlmError::EmptyResponse));
        };
        if let Decision::ToolCalls(calls) = &decision {
            if calls.len() > 1 {
                let ignored: Vec<&str> = calls[1..].iter().map(|c| c.name.as_str()).collect();
                warn!(tool = %call.name, ?ignored, "model requested several tools; only the first runs");
            }
        }

        let mut arguments = call
            .parse_arguments()
            .map_err(|source| DispatchError::MalformedArguments {
                tool: call.name.clone(),
                source,
            })?;
        if lacks_user_id(&arguments) {
            arguments.insert("user_id".to_string(), Value::String(user_id.to_string()));
        }
        info!(tool = %call.name, arguments = %serde_json::Value::Object(arguments.clone()), "model called tool");

        let reply = match self.tools.execute(&call.name, Value::Object(arguments)).await {
            Ok(reply) => reply,
            Err(ToolError::UnknownTool(name)) => {
                warn!(tool = %name, "model called an unknown tool");
                catalog::unrecognized(&name)
            }
            Err(ToolError::InvalidArguments { tool, reason }) => {
                error!(%tool, %reason, "tool arguments rejected");
                return Err(DispatchError::InvalidArguments { tool, reason });
            }
        };

        info!(
            action_taken = reply.action_taken.map(|a| a.as_str()).unwrap_or("none"),
            response_len = reply.text.len(),
            "sending response"
        );
        Ok(reply.into())
    }
}

/// Models sometimes send `"user_id": null` or `""` instead of leaving it out
fn lacks_user_id(arguments: &Map<String, Value>) -> bool {
    match arguments.get("user_id") {
        None | Some(Value::Null) => true,
        Some(Value::String(id)) => id.trim().is_empty(),
        Some(_) => false,
    }
}
