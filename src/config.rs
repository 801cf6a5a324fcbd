//! Configuration management
//!
//! Settings come from built-in defaults overlaid with environment variables.
//! A `.env` file in the working directory is loaded into the environment first.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::{ClientSecret, IdentityCredentials};
use crate::llm::{ClaudeModel, GenerationConfig, GroqModel, Model, ProviderAccess};

/// Environment variables read into `AppConfig`
const ENV_KEYS: &[&str] = &[
    "SAILPOINT_API_URL",
    "SAILPOINT_CLIENT_ID",
    "SAILPOINT_CLIENT_SECRET",
    "LLM_PROVIDER",
    "GROQ_API_KEY",
    "GROQ_MODEL",
    "GCP_PROJECT_ID",
    "GCP_LOCATION",
    "CLAUDE_MODEL",
    "LLM_TEMPERATURE",
    "LLM_MAX_TOKENS",
    "APP_HOST",
    "APP_PORT",
    "ALLOWED_ORIGINS",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}

/// Which LLM backend answers chat turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    Groq,
    Claude,
}

/// Application configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// IdentityIQ base URL
    #[serde(deserialize_with = "lenient_string")]
    pub sailpoint_api_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sailpoint_client_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sailpoint_client_secret: String,

    pub llm_provider: LlmBackend,
    #[serde(deserialize_with = "lenient_string")]
    pub groq_api_key: String,
    pub groq_model: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gcp_project_id: String,
    pub gcp_location: String,
    pub claude_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,

    pub app_host: String,
    pub app_port: u16,
    /// Comma-separated CORS origins
    pub allowed_origins: String,

    pub log_level: String,
    /// `text` or `json`
    pub log_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sailpoint_api_url: String::new(),
            sailpoint_client_id: String::new(),
            sailpoint_client_secret: String::new(),
            llm_provider: LlmBackend::Groq,
            groq_api_key: String::new(),
            groq_model: GroqModel::Llama33Versatile.as_str().to_string(),
            gcp_project_id: String::new(),
            gcp_location: "us-central1".to_string(),
            claude_model: "haiku-4.5".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 500,
            app_host: "127.0.0.1".to_string(),
            app_port: 8000,
            allowed_origins: "http://localhost:3000,http://localhost:5173".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "<redacted>" };
        let client_id_prefix = if self.sailpoint_client_id.is_empty() {
            String::new()
        } else {
            let prefix: String = self.sailpoint_client_id.chars().take(10).collect();
            format!("{prefix}...")
        };
        f.debug_struct("AppConfig")
            .field("sailpoint_api_url", &self.sailpoint_api_url)
            .field("sailpoint_client_id", &client_id_prefix)
            .field("sailpoint_client_secret", &redact(&self.sailpoint_client_secret))
            .field("llm_provider", &self.llm_provider)
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("groq_model", &self.groq_model)
            .field("gcp_project_id", &self.gcp_project_id)
            .field("gcp_location", &self.gcp_location)
            .field("claude_model", &self.claude_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("app_host", &self.app_host)
            .field("app_port", &self.app_port)
            .field("allowed_origins", &self.allowed_origins)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `.env`, then the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal in deployed environments
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    /// Defaults merged with the recognised environment variables
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Env::raw().only(ENV_KEYS))
    }

    /// Extract and validate a configuration from any figment
    ///
    /// # Errors
    ///
    /// Returns an error on type mismatches or out-of-range values.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::Invalid(format!(
                "LLM_TEMPERATURE must be between 0 and 2, got {}",
                self.llm_temperature
            )));
        }
        if self.llm_max_tokens == 0 {
            return Err(ConfigError::Invalid("LLM_MAX_TOKENS must be positive".to_string()));
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            )));
        }
        Ok(())
    }

    /// Whether all three IdentityIQ settings are present
    pub fn identity_configured(&self) -> bool {
        !(self.sailpoint_api_url.trim().is_empty()
            || self.sailpoint_client_id.trim().is_empty()
            || self.sailpoint_client_secret.is_empty())
    }

    /// Move the IdentityIQ credentials out of the configuration
    ///
    /// The secret is cleared from `self` so only the identity client keeps it.
    pub fn take_identity_credentials(&mut self) -> IdentityCredentials {
        IdentityCredentials::new(
            self.sailpoint_api_url.clone(),
            self.sailpoint_client_id.clone(),
            ClientSecret::new(std::mem::take(&mut self.sailpoint_client_secret)),
        )
    }

    /// Whether the selected LLM backend has what it needs to start
    pub fn llm_configured(&self) -> bool {
        match self.llm_provider {
            LlmBackend::Groq => !self.groq_api_key.trim().is_empty(),
            LlmBackend::Claude => !self.gcp_project_id.trim().is_empty(),
        }
    }

    /// The model for the selected backend
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown Claude model name.
    pub fn model(&self) -> Result<Model, ConfigError> {
        match self.llm_provider {
            LlmBackend::Groq => Ok(Model::Groq(GroqModel::from_id(&self.groq_model))),
            LlmBackend::Claude => ClaudeModel::from_name(&self.claude_model)
                .map(Model::Claude)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("Unknown CLAUDE_MODEL '{}'", self.claude_model))
                }),
        }
    }

    /// Credentials for the selected backend
    pub fn provider_access(&self) -> ProviderAccess {
        match self.llm_provider {
            LlmBackend::Groq => ProviderAccess::ApiKey(self.groq_api_key.clone()),
            LlmBackend::Claude => ProviderAccess::Vertex {
                project_id: self.gcp_project_id.clone(),
                location: self.gcp_location.clone(),
            },
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::new(self.llm_max_tokens).with_temperature(self.llm_temperature)
    }

    /// Address the HTTP server binds to
    ///
    /// # Errors
    ///
    /// Returns an error if `APP_HOST` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.app_host.parse().map_err(|e| {
            ConfigError::Invalid(format!("APP_HOST '{}' is not an IP address: {e}", self.app_host))
        })?;
        Ok(SocketAddr::new(ip, self.app_port))
    }

    /// CORS origins, trimmed, empty entries dropped
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Accept any scalar where a string is expected
///
/// Environment values that look numeric (client ids, keys) arrive as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Uint(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Uint(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}
