//! The three support tools: argument types, registration and reply formatting

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::identity::{IdentityOperations, OperationResult};
use crate::llm::tools::{create_tool_declaration, FunctionRegistry, RegistryError};

pub const TRIGGER_IDENTITY_REFRESH: &str = "trigger_identity_refresh";
pub const CHECK_REQUEST_STATUS: &str = "check_request_status";
pub const GET_IDENTITY_INFO: &str = "get_identity_info";

pub const DEFAULT_REFRESH_REASON: &str = "User access issue";
pub const WAIT_HINT: &str = "Please wait 2-3 minutes and try accessing the application again.";

const TRIGGER_IDENTITY_REFRESH_DESCRIPTION: &str = "Trigger identity refresh in SailPoint IIQ when user can't access after approval, colleagues have access but they don't, or dynamic access not working. Extract the username from the user's message (e.g. \"User Ram\" -> Ram, \"Aaron.Nichols\" -> Aaron.Nichols, \"John Smith\" -> John.Smith).";
const CHECK_REQUEST_STATUS_DESCRIPTION: &str = "Check access request status in SailPoint IIQ";
const GET_IDENTITY_INFO_DESCRIPTION: &str = "Get detailed identity information from SailPoint IIQ";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TriggerRefreshArgs {
    /// The username/user_id extracted from the message (e.g., 'Ram', 'Aaron.Nichols', 'John.Smith'). Look for names mentioned in the message.
    pub user_id: String,
    /// Brief reason why refresh is needed (e.g., 'Dynamic access not provisioned', 'Approved but can't access')
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CheckStatusArgs {
    /// Request ID or user ID
    pub request_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IdentityInfoArgs {
    /// The user ID to get information about
    pub user_id: String,
}

/// Which action a chat turn performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    IdentityRefreshTriggered,
    StatusCheck,
    IdentityInfo,
}

impl ActionTaken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTaken::IdentityRefreshTriggered => "identity_refresh_triggered",
            ActionTaken::StatusCheck => "status_check",
            ActionTaken::IdentityInfo => "identity_info",
        }
    }
}

/// A formatted tool result, ready to send back to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReply {
    pub text: String,
    pub action_taken: Option<ActionTaken>,
}

/// Build the registry of support tools bound to an identity facade
///
/// # Errors
///
/// Only if two tools share a name, which the fixed catalog never does.
pub fn build_registry(
    identity: Arc<dyn IdentityOperations>,
) -> Result<FunctionRegistry<ToolReply>, RegistryError> {
    let mut registry = FunctionRegistry::new();

    let ops = identity.clone();
    registry.register_async(
        create_tool_declaration::<TriggerRefreshArgs>(
            TRIGGER_IDENTITY_REFRESH,
            TRIGGER_IDENTITY_REFRESH_DESCRIPTION,
        ),
        move |args: TriggerRefreshArgs| {
            let ops = ops.clone();
            async move {
                let reason = args.reason.as_deref().unwrap_or(DEFAULT_REFRESH_REASON);
                info!(tool = TRIGGER_IDENTITY_REFRESH, user_id = %args.user_id, reason, "running tool");
                let result = ops.trigger_refresh(&args.user_id).await;
                info!(tool = TRIGGER_IDENTITY_REFRESH, success = result.success, "tool finished");
                ToolReply {
                    text: format_refresh(&result),
                    action_taken: Some(ActionTaken::IdentityRefreshTriggered),
                }
            }
        },
    )?;

    let ops = identity.clone();
    registry.register_async(
        create_tool_declaration::<CheckStatusArgs>(
            CHECK_REQUEST_STATUS,
            CHECK_REQUEST_STATUS_DESCRIPTION,
        ),
        move |args: CheckStatusArgs| {
            let ops = ops.clone();
            async move {
                info!(tool = CHECK_REQUEST_STATUS, request_id = %args.request_id, "running tool");
                let result = ops.get_request_status(&args.request_id).await;
                ToolReply {
                    text: format_status(&result),
                    action_taken: Some(ActionTaken::StatusCheck),
                }
            }
        },
    )?;

    let ops = identity;
    registry.register_async(
        create_tool_declaration::<IdentityInfoArgs>(GET_IDENTITY_INFO, GET_IDENTITY_INFO_DESCRIPTION),
        move |args: IdentityInfoArgs| {
            let ops = ops.clone();
            async move {
                info!(tool = GET_IDENTITY_INFO, user_id = %args.user_id, "running tool");
                let result = ops.get_identity(&args.user_id).await;
                ToolReply {
                    text: format_identity(&result),
                    action_taken: Some(ActionTaken::IdentityInfo),
                }
            }
        },
    )?;

    Ok(registry)
}

/// Reply for an unknown tool name
pub fn unrecognized(name: &str) -> ToolReply {
    ToolReply {
        text: format!("Tool '{name}' not recognized"),
        action_taken: None,
    }
}

fn pretty(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

fn payload_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

pub fn format_refresh(result: &OperationResult) -> String {
    let payload = result.raw_payload();
    let message = Some(result.message.as_str())
        .filter(|m| !m.is_empty())
        .or_else(|| payload_str(&payload, "message"))
        .unwrap_or("Identity refresh triggered");
    let task_status = result
        .task_status
        .as_deref()
        .or_else(|| payload_str(&payload, "taskStatus"))
        .unwrap_or("Unknown");

    format!(
        "{message}\n\nTask Status: {task_status}\n\n{WAIT_HINT}\n\nSailPoint IIQ API Response:\n{}",
        pretty(&payload)
    )
}

pub fn format_status(result: &OperationResult) -> String {
    format!(
        "Request Status: {}\n\nSailPoint IIQ API Response:\n\n{}",
        result.status.as_deref().unwrap_or("unknown"),
        pretty(&result.raw_payload())
    )
}

pub fn format_identity(result: &OperationResult) -> String {
    format!(
        "Identity Information:\n\nSailPoint IIQ API Response:\n\n{}",
        pretty(&result.raw_payload())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UnconfiguredIdentity;
    use crate::llm::tools::ToolExecutor;
    use serde_json::json;

    fn registry() -> FunctionRegistry<ToolReply> {
        build_registry(Arc::new(UnconfiguredIdentity)).unwrap()
    }

    #[test]
    fn test_catalog_order_and_names() {
        assert_eq!(
            registry().names(),
            vec![TRIGGER_IDENTITY_REFRESH, CHECK_REQUEST_STATUS, GET_IDENTITY_INFO]
        );
    }

    #[test]
    fn test_refresh_schema_requires_only_user_id() {
        let declarations = registry().declarations();
        let refresh = &declarations[0];

        assert_eq!(refresh.parameters["type"], "object");
        assert_eq!(refresh.parameters["required"], json!(["user_id"]));
        assert_eq!(refresh.parameters["properties"]["reason"]["type"], "string");
        let user_id_doc = refresh.parameters["properties"]["user_id"]["description"]
            .as_str()
            .unwrap();
        assert!(user_id_doc.contains("Aaron.Nichols"));
        assert!(refresh.description.contains("John.Smith"));
    }

    #[test]
    fn test_status_and_identity_schemas() {
        let declarations = registry().declarations();
        assert_eq!(declarations[1].parameters["required"], json!(["request_id"]));
        assert_eq!(declarations[2].parameters["required"], json!(["user_id"]));
    }

    #[test]
    fn test_action_taken_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ActionTaken::IdentityRefreshTriggered).unwrap(),
            json!("identity_refresh_triggered")
        );
        assert_eq!(serde_json::to_value(ActionTaken::StatusCheck).unwrap(), json!("status_check"));
        assert_eq!(ActionTaken::IdentityInfo.as_str(), "identity_info");
    }

    #[test]
    fn test_format_refresh() {
        let payload = json!({"status": "success", "taskStatus": "Queued"});
        let result = OperationResult {
            success: true,
            message: "Refresh started".to_string(),
            task_status: Some("Queued".to_string()),
            sailpoint_response: payload.as_object().cloned(),
            ..OperationResult::default()
        };

        let text = format_refresh(&result);

        assert!(text.starts_with("Refresh started\n\nTask Status: Queued\n\n"));
        assert!(text.contains(WAIT_HINT));
        assert!(text.ends_with(&serde_json::to_string_pretty(&payload).unwrap()));
    }

    #[test]
    fn test_format_refresh_falls_back_to_payload_fields() {
        let result = OperationResult {
            sailpoint_response: json!({"message": "From IIQ", "taskStatus": "Running"})
                .as_object()
                .cloned(),
            ..OperationResult::default()
        };

        let text = format_refresh(&result);

        assert!(text.starts_with("From IIQ\n\nTask Status: Running"));
    }

    #[test]
    fn test_format_placeholders() {
        let status = format_status(&OperationResult::failure("placeholder"));
        assert_eq!(status, "Request Status: unknown\n\nSailPoint IIQ API Response:\n\n{}");

        let identity = format_identity(&OperationResult::failure("placeholder"));
        assert_eq!(identity, "Identity Information:\n\nSailPoint IIQ API Response:\n\n{}");
    }

    #[test]
    fn test_unrecognized_reply() {
        let reply = unrecognized("delete_everything");
        assert_eq!(reply.text, "Tool 'delete_everything' not recognized");
        assert_eq!(reply.action_taken, None);
    }

    #[tokio::test]
    async fn test_refresh_tool_runs_against_facade() {
        let reply = registry()
            .execute(TRIGGER_IDENTITY_REFRESH, json!({"user_id": "Ram"}))
            .await
            .unwrap();

        assert_eq!(reply.action_taken, Some(ActionTaken::IdentityRefreshTriggered));
        assert!(reply.text.starts_with("SailPoint API not configured"));
    }
}
