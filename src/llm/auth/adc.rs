//! Application Default Credentials (ADC) wrapper for Vertex AI

use gcp_auth::AuthenticationManager as GcpAuthManager;

use crate::llm::core::error::LlmError;

/// OAuth scope Vertex AI prediction calls require
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Manages GCP access tokens for the Claude-on-Vertex provider
///
/// Tokens are cached and refreshed by `gcp_auth`. Credentials are discovered
/// from `GOOGLE_APPLICATION_CREDENTIALS`, `gcloud auth application-default
/// login`, or the metadata server.
pub struct AuthenticationManager {
    inner: GcpAuthManager,
}

impl AuthenticationManager {
    /// Discover credentials using the standard ADC flow.
    ///
    /// # Errors
    /// Returns an error if no valid credentials can be found.
    pub async fn new() -> Result<Self, LlmError> {
        let inner = GcpAuthManager::new().await.map_err(|e| {
            LlmError::AuthenticationError(format!("Failed to initialize ADC: {}", e))
        })?;
        tracing::info!("vertex ADC credentials discovered");

        Ok(Self { inner })
    }

    /// Get a bearer token for the cloud platform scope
    ///
    /// # Errors
    /// Returns an error if token retrieval or refresh fails.
    pub async fn get_token(&self) -> Result<String, LlmError> {
        let token = self
            .inner
            .get_token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| LlmError::AuthenticationError(format!("Failed to get token: {}", e)))?;

        Ok(token.as_str().to_string())
    }
}
