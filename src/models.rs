// Request and response bodies for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dispatch::{ActionTaken, ChatReply};

pub const DEFAULT_USER_ID: &str = "anonymous";
pub const SERVICE_NAME: &str = "SailPoint Support Bot";

// POST /chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// Caller id, `anonymous` when not given
    pub fn user_id(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(DEFAULT_USER_ID)
    }
}

// POST /chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub action_taken: Option<ActionTaken>,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            response: reply.text,
            action_taken: reply.action_taken,
        }
    }
}

// Error body for non-2xx answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Active,
    Inactive,
}

impl ComponentStatus {
    pub fn from_active(active: bool) -> Self {
        if active {
            ComponentStatus::Active
        } else {
            ComponentStatus::Inactive
        }
    }
}

// GET / response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub llm_client: ComponentStatus,
    pub identity_client: ComponentStatus,
    pub timestamp: DateTime<Utc>,
}

// GET /tools/status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsStatusResponse {
    pub tools: Vec<String>,
    pub tool_choice: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_user_id_defaults() {
        let request: ChatRequest = serde_json::from_value(json!({"message": "hi"})).unwrap();
        assert_eq!(request.user_id(), "anonymous");

        let request: ChatRequest =
            serde_json::from_value(json!({"message": "hi", "user_id": null})).unwrap();
        assert_eq!(request.user_id(), "anonymous");

        let request: ChatRequest =
            serde_json::from_value(json!({"message": "hi", "user_id": "Ram"})).unwrap();
        assert_eq!(request.user_id(), "Ram");
    }

    #[test]
    fn test_chat_request_requires_message() {
        assert!(serde_json::from_value::<ChatRequest>(json!({"user_id": "Ram"})).is_err());
    }

    #[test]
    fn test_chat_response_serialization() {
        let response = ChatResponse {
            response: "done".to_string(),
            action_taken: Some(ActionTaken::StatusCheck),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"response": "done", "action_taken": "status_check"})
        );

        let direct = ChatResponse {
            response: "hello".to_string(),
            action_taken: None,
        };
        assert!(serde_json::to_value(&direct).unwrap()["action_taken"].is_null());
    }

    #[test]
    fn test_component_status_serialization() {
        assert_eq!(
            serde_json::to_value(ComponentStatus::from_active(false)).unwrap(),
            json!("inactive")
        );
    }
}
