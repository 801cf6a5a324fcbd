//! Provider trait for LLM implementations

use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{Decision, GenerateRequest, Model},
};
use crate::llm::claude::ClaudeClient;
use crate::llm::groq::GroqClient;

/// Main interface that all LLM provider implementations must satisfy
///
/// A provider is treated as a function-calling oracle: it receives the system
/// prompt, the tool declarations and the conversation, and answers with either
/// plain text or the tool call(s) it wants made.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Ask the model what to do with this request
    async fn decide(&self, request: GenerateRequest) -> Result<Decision, LlmError>;
}

/// Where a provider gets its credentials from
#[derive(Clone)]
pub enum ProviderAccess {
    /// Static API key (Groq)
    ApiKey(String),
    /// GCP project on Vertex AI, authenticated via Application Default Credentials
    Vertex { project_id: String, location: String },
}

impl std::fmt::Debug for ProviderAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderAccess::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            ProviderAccess::Vertex {
                project_id,
                location,
            } => f
                .debug_struct("Vertex")
                .field("project_id", project_id)
                .field("location", location)
                .finish(),
        }
    }
}

/// Create an LLM provider from a model specification
///
/// # Example
///
/// ```rust,no_run
/// use support_bot::llm::{create_provider, GroqModel, Model, ProviderAccess};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = create_provider(
///     Model::Groq(GroqModel::Llama33Versatile),
///     ProviderAccess::ApiKey("gsk_...".to_string()),
/// ).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_provider(
    model: Model,
    access: ProviderAccess,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match (model, access) {
        (Model::Groq(groq_model), ProviderAccess::ApiKey(api_key)) => {
            let client = GroqClient::new(api_key, groq_model)?;
            Ok(Box::new(client))
        }
        (
            Model::Claude(claude_model),
            ProviderAccess::Vertex {
                project_id,
                location,
            },
        ) => {
            let client = ClaudeClient::new(project_id, location, claude_model).await?;
            Ok(Box::new(client))
        }
        (model, access) => Err(LlmError::InvalidRequest(format!(
            "model {} cannot be used with {:?}",
            model.as_str(),
            access
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::claude::ClaudeModel;

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let access = ProviderAccess::ApiKey("gsk_secret_value".to_string());
        let rendered = format!("{access:?}");
        assert!(!rendered.contains("gsk_secret_value"));
        assert!(rendered.contains("redacted"));
    }

    #[tokio::test]
    async fn test_mismatched_access_is_rejected() {
        let result = create_provider(
            Model::Claude(ClaudeModel::Haiku45),
            ProviderAccess::ApiKey("key".to_string()),
        )
        .await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }
}
