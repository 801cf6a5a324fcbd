//! End-to-end tests for the HTTP API
//!
//! A real `SailPointApi` talks to a scripted IdentityIQ transport and the LLM
//! is replaced by a fixed decision, so these run without network access.

mod common;

use common::{app_state, FixedProvider, ScriptedIdentityServer, REFRESH_PATH, TOKEN_PATH};
use serde_json::{json, Value};
use support_bot::llm::{Decision, ToolCall};
use support_bot::routes::{configure_app, configure_routes};
use warp::http::StatusCode;

const REFRESH_BODY: &str = r#"{"status":"success","userId":"Aaron.Nichols","message":"Refresh started","taskStatus":"Queued"}"#;

fn refresh_decision(arguments: &str) -> Decision {
    Decision::ToolCalls(vec![ToolCall::new(
        "call_0",
        "trigger_identity_refresh",
        arguments,
    )])
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body is JSON")
}

#[tokio::test]
async fn test_chat_triggers_refresh() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok-1").answer_refresh(200, REFRESH_BODY);
    let provider = FixedProvider::deciding(refresh_decision(r#"{"user_id":"Aaron.Nichols"}"#));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "Aaron.Nichols doesn't have access", "user_id": "helpdesk"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["action_taken"], "identity_refresh_triggered");
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("Refresh started\n\nTask Status: Queued"));
    assert!(text.contains("Please wait 2-3 minutes"));
    assert!(text.contains("\"taskStatus\": \"Queued\""));

    let refreshes = server.calls_to(REFRESH_PATH);
    assert_eq!(refreshes.len(), 1);
    assert!(refreshes[0].url.ends_with("userId=Aaron.Nichols"));
    assert_eq!(refreshes[0].authorization, "Bearer tok-1");
}

#[tokio::test]
async fn test_chat_recovers_from_expired_token() {
    let server = ScriptedIdentityServer::new();
    server
        .issue_token("expired")
        .issue_token("renewed")
        .answer_refresh(401, "token expired")
        .answer_refresh(200, REFRESH_BODY);
    let provider = FixedProvider::deciding(refresh_decision(r#"{"user_id":"Aaron.Nichols"}"#));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "Aaron.Nichols lost access"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert!(body["response"].as_str().unwrap().starts_with("Refresh started"));
    assert_eq!(server.calls_to(TOKEN_PATH).len(), 2);
    assert_eq!(server.calls_to(REFRESH_PATH)[1].authorization, "Bearer renewed");
}

#[tokio::test]
async fn test_chat_reports_repeated_401_as_tool_failure() {
    let server = ScriptedIdentityServer::new();
    server
        .issue_token("a")
        .issue_token("b")
        .answer_refresh(401, "nope")
        .answer_refresh(401, "still nope");
    let provider = FixedProvider::deciding(refresh_decision(r#"{"user_id":"Ram"}"#));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "User Ram can't login"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["action_taken"], "identity_refresh_triggered");
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Authentication failed: 401"));
    assert_eq!(server.calls_to(REFRESH_PATH).len(), 2);
}

#[tokio::test]
async fn test_chat_falls_back_to_request_user_id() {
    let server = ScriptedIdentityServer::new();
    server
        .issue_token("tok")
        .answer_refresh(200, r#"{"status":"success"}"#);
    let provider = FixedProvider::deciding(refresh_decision("{}"));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "I can't reach the app", "user_id": "Ram"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(server.calls_to(REFRESH_PATH)[0].url.ends_with("userId=Ram"));
    let body = body_json(response.body());
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Identity refresh triggered for Ram"));
}

#[tokio::test]
async fn test_chat_null_user_id_falls_back_to_request_user_id() {
    let server = ScriptedIdentityServer::new();
    server
        .issue_token("tok")
        .answer_refresh(200, r#"{"status":"success"}"#);
    let provider = FixedProvider::deciding(refresh_decision(r#"{"user_id":null}"#));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "I can't reach the app", "user_id": "Ram"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(server.calls_to(REFRESH_PATH)[0].url.ends_with("userId=Ram"));
}

#[tokio::test]
async fn test_chat_direct_text() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let provider = FixedProvider::deciding(Decision::DirectText(
        "Could you tell me the username?".to_string(),
    ));
    let requests = provider.requests.clone();
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "hello"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["response"], "Could you tell me the username?");
    assert!(body["action_taken"].is_null());
    assert!(server.calls_to(REFRESH_PATH).is_empty());
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_unknown_tool() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let provider = FixedProvider::deciding(Decision::ToolCalls(vec![ToolCall::new(
        "call_0",
        "delete_everything",
        "{}",
    )]));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "delete everything"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["response"], "Tool 'delete_everything' not recognized");
    assert!(body["action_taken"].is_null());
}

#[tokio::test]
async fn test_chat_llm_failure_is_generic_500() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let provider = FixedProvider::failing("upstream secret detail");
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "hello"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.body());
    assert_eq!(body["detail"], "Error processing request");
    assert!(!String::from_utf8_lossy(response.body()).contains("upstream secret detail"));
}

#[tokio::test]
async fn test_chat_malformed_tool_arguments_is_500() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let provider = FixedProvider::deciding(refresh_decision("{\"user_id\": "));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "help"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(server.calls_to(REFRESH_PATH).is_empty());
}

#[tokio::test]
async fn test_chat_without_llm_provider() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let routes = configure_routes(app_state(&server, None).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"message": "hello"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response.body()),
        json!({"detail": "LLM client not initialized"})
    );
}

#[tokio::test]
async fn test_chat_rejects_missing_message() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let provider = FixedProvider::deciding(Decision::DirectText("unused".to_string()));
    let routes = configure_routes(app_state(&server, Some(provider)).await);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&json!({"user_id": "Ram"}))
        .reply(&routes)
        .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_root_health_and_tools_status() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let routes = configure_routes(app_state(&server, None).await);

    let root = warp::test::request().path("/").reply(&routes).await;
    assert_eq!(root.status(), StatusCode::OK);
    let root = body_json(root.body());
    assert_eq!(root["status"], "active");
    assert_eq!(root["service"], "SailPoint Support Bot");

    let health = warp::test::request().path("/health").reply(&routes).await;
    let health = body_json(health.body());
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["llm_client"], "inactive");
    assert_eq!(health["identity_client"], "active");
    assert!(health["timestamp"].is_string());

    let tools = warp::test::request().path("/tools/status").reply(&routes).await;
    assert_eq!(
        body_json(tools.body()),
        json!({
            "tools": ["trigger_identity_refresh", "check_request_status", "get_identity_info"],
            "tool_choice": "auto"
        })
    );
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let server = ScriptedIdentityServer::new();
    server.issue_token("tok");
    let provider = FixedProvider::deciding(Decision::DirectText("ok".to_string()));
    let app = configure_app(
        app_state(&server, Some(provider)).await,
        &["http://localhost:3000".to_string()],
    );

    let allowed = warp::test::request()
        .method("OPTIONS")
        .path("/chat")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .reply(&app)
        .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let denied = warp::test::request()
        .method("OPTIONS")
        .path("/chat")
        .header("origin", "https://evil.example")
        .header("access-control-request-method", "POST")
        .reply(&app)
        .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}
