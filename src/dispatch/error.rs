use crate::llm::LlmError;

/// Errors that end a chat turn
///
/// These never reach the chat caller verbatim; the HTTP layer logs them and
/// answers with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Error from the LLM provider
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool arguments were not a JSON object
    #[error("Failed to parse arguments for {tool}: {source}")]
    MalformedArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// Tool arguments parsed but did not fit the tool
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}
