//! Claude client implementation

use async_trait::async_trait;
use reqwest::Client;

use crate::llm::auth::adc::AuthenticationManager;
use crate::llm::core::{
    error::LlmError,
    provider::LlmProvider,
    types::{Decision, GenerateRequest},
};

use super::mapper::{error_from_response, from_claude_response, to_claude_request};
use super::types::ClaudeResponse;

/// Claude model identifiers for Vertex AI
#[derive(Debug, Clone)]
pub enum ClaudeModel {
    /// Claude Sonnet 4.5 (released 2025-09-29)
    Sonnet45,
    /// Claude Haiku 4.5 (released 2025-10-01)
    Haiku45,
}

impl ClaudeModel {
    /// Get the model identifier string for Vertex AI
    pub fn as_str(&self) -> &str {
        match self {
            ClaudeModel::Sonnet45 => "claude-sonnet-4-5@20250929",
            ClaudeModel::Haiku45 => "claude-haiku-4-5@20251001",
        }
    }

    /// Parse a short configured name (`sonnet-4.5`, `haiku-4.5`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sonnet-4.5" | "sonnet45" | "claude-sonnet-4-5@20250929" => Some(ClaudeModel::Sonnet45),
            "haiku-4.5" | "haiku45" | "claude-haiku-4-5@20251001" => Some(ClaudeModel::Haiku45),
            _ => None,
        }
    }
}

/// Client for interacting with Claude models on Vertex AI
pub struct ClaudeClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Authentication manager for ADC tokens
    auth_manager: AuthenticationManager,
    /// GCP project ID
    project_id: String,
    /// GCP location (region)
    location: String,
    /// Model to use
    model: ClaudeModel,
}

impl ClaudeClient {
    /// Create a new Claude client
    ///
    /// # Arguments
    ///
    /// * `project_id` - GCP project ID
    /// * `location` - GCP location (e.g., "us-central1")
    /// * `model` - Claude model to use
    ///
    /// # Errors
    ///
    /// Returns an error if authentication initialization fails.
    pub async fn new(
        project_id: String,
        location: String,
        model: ClaudeModel,
    ) -> Result<Self, LlmError> {
        if project_id.trim().is_empty() {
            return Err(LlmError::InvalidRequest(
                "GCP_PROJECT_ID is not set".to_string(),
            ));
        }

        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        let auth_manager = AuthenticationManager::new().await?;

        Ok(Self {
            http_client,
            auth_manager,
            project_id,
            location,
            model,
        })
    }

    /// Build the endpoint URL for a single prediction
    fn build_endpoint_url(&self) -> String {
        endpoint_url(&self.location, &self.project_id, &self.model)
    }

    async fn make_request(&self, request: GenerateRequest) -> Result<Decision, LlmError> {
        let claude_request = to_claude_request(request);
        let token = self.auth_manager.get_token().await?;

        let response = self
            .http_client
            .post(self.build_endpoint_url())
            .bearer_auth(token)
            .json(&claude_request)
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

        let prediction: ClaudeResponse = response.json().await?;
        if let Some(usage) = &prediction.usage {
            tracing::debug!(
                message_id = %prediction.id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = prediction.stop_reason.as_deref().unwrap_or("unknown"),
                "claude usage"
            );
        }

        from_claude_response(prediction)
    }
}

fn endpoint_url(location: &str, project_id: &str, model: &ClaudeModel) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/v1/projects/{}/locations/{}/publishers/anthropic/models/{}:rawPredict",
        location, project_id, location, model.as_str()
    )
}

#[async_trait]
impl LlmProvider for ClaudeClient {
    async fn decide(&self, request: GenerateRequest) -> Result<Decision, LlmError> {
        self.make_request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_model_as_str() {
        assert_eq!(ClaudeModel::Sonnet45.as_str(), "claude-sonnet-4-5@20250929");
        assert_eq!(ClaudeModel::Haiku45.as_str(), "claude-haiku-4-5@20251001");
    }

    #[test]
    fn test_claude_model_from_name() {
        assert!(matches!(
            ClaudeModel::from_name("Haiku-4.5"),
            Some(ClaudeModel::Haiku45)
        ));
        assert!(matches!(
            ClaudeModel::from_name("sonnet-4.5"),
            Some(ClaudeModel::Sonnet45)
        ));
        assert!(ClaudeModel::from_name("opus").is_none());
    }

    #[test]
    fn test_model_endpoint_url_format() {
        let url = endpoint_url("us-central1", "my-project", &ClaudeModel::Sonnet45);

        assert!(url.contains("us-central1-aiplatform.googleapis.com"));
        assert!(url.contains("my-project"));
        assert!(url.contains("claude-sonnet-4-5@20250929"));
        assert!(url.contains("publishers/anthropic"));
        assert!(url.ends_with(":rawPredict"));
    }

    #[tokio::test]
    async fn test_empty_project_rejected() {
        let result = ClaudeClient::new(
            String::new(),
            "us-central1".to_string(),
            ClaudeModel::Haiku45,
        )
        .await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }
}
