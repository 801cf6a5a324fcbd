//! Groq client implementation

use async_trait::async_trait;
use reqwest::Client;

use crate::llm::core::{
    error::LlmError,
    provider::LlmProvider,
    types::{Decision, GenerateRequest},
};

use super::mapper::{error_from_response, from_groq_response, to_groq_request};
use super::types::ChatCompletionResponse;

const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq model identifiers
#[derive(Debug, Clone)]
pub enum GroqModel {
    /// Llama 3.3 70B, the default support model
    Llama33Versatile,
    /// Llama 3.1 8B, faster and cheaper
    Llama31Instant,
    /// Any other model id Groq serves
    Custom(String),
}

impl GroqModel {
    /// Get the model identifier string for the API
    pub fn as_str(&self) -> &str {
        match self {
            GroqModel::Llama33Versatile => "llama-3.3-70b-versatile",
            GroqModel::Llama31Instant => "llama-3.1-8b-instant",
            GroqModel::Custom(id) => id,
        }
    }

    /// Resolve a configured model id, falling back to `Custom`
    pub fn from_id(id: &str) -> Self {
        match id {
            "llama-3.3-70b-versatile" => GroqModel::Llama33Versatile,
            "llama-3.1-8b-instant" => GroqModel::Llama31Instant,
            other => GroqModel::Custom(other.to_string()),
        }
    }
}

/// Client for Groq's chat completions endpoint
pub struct GroqClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer API key
    api_key: String,
    /// Model to use
    model: GroqModel,
    /// Endpoint URL
    endpoint: String,
}

impl GroqClient {
    /// Create a new Groq client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(api_key: String, model: GroqModel) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::AuthenticationError(
                "GROQ_API_KEY is not set".to_string(),
            ));
        }

        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            model,
            endpoint: GROQ_CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn make_request(&self, request: GenerateRequest) -> Result<Decision, LlmError> {
        let groq_request = to_groq_request(request, self.model.as_str());

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&groq_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(
                status.as_u16(),
                retry_after.as_deref(),
                body,
            ));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                completion_id = %completion.id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "groq usage"
            );
        }
        if let Some(reason) = completion.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!(finish_reason = reason, "groq finished");
        }

        from_groq_response(completion)
    }
}

#[async_trait]
impl LlmProvider for GroqClient {
    async fn decide(&self, request: GenerateRequest) -> Result<Decision, LlmError> {
        self.make_request(request).await
    }
}
