//! Identity client data types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client secret for the OAuth2 client-credentials flow
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

/// Everything needed to authenticate against IdentityIQ
///
/// Moved into `SailPointApi` at startup; nothing else keeps a copy.
#[derive(Debug, Clone, Default)]
pub struct IdentityCredentials {
    /// IdentityIQ base URL, e.g. `https://iiq.example.com`
    pub base_url: String,
    pub client_id: String,
    pub client_secret: ClientSecret,
}

impl IdentityCredentials {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: ClientSecret,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret,
        }
    }

    /// True when any of the three values is missing
    pub fn is_incomplete(&self) -> bool {
        self.base_url.trim().is_empty()
            || self.client_id.trim().is_empty()
            || self.client_secret.is_empty()
    }
}

/// Outcome of an identity operation, as handed to tool callers
///
/// `sailpoint_response` carries the external system's JSON body untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sailpoint_response: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl OperationResult {
    /// A failed operation with the given message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Stamp the result with the current time
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }

    /// The external payload, or an empty object when there is none
    pub fn raw_payload(&self) -> Value {
        Value::Object(self.sailpoint_response.clone().unwrap_or_default())
    }
}

/// The fields of a refresh acknowledgement the bot relies on
///
/// Everything else in the payload is passed through opaquely. Non-string
/// values count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshAck {
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub message: Option<String>,
    pub task_status: Option<String>,
}

impl RefreshAck {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let field = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            status: field("status"),
            user_id: field("userId"),
            message: field("message"),
            task_status: field("taskStatus"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}
