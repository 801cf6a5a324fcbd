// GET /, GET /health and GET /tools/status handlers

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::llm::ToolChoice;
use crate::models::{ComponentStatus, HealthResponse, RootResponse, ToolsStatusResponse, SERVICE_NAME};
use crate::state::AppState;

pub async fn root_handler() -> Result<impl warp::Reply, warp::Rejection> {
    debug!("root endpoint accessed");
    Ok(warp::reply::json(&RootResponse {
        status: "active".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

pub async fn health_handler(state: Arc<AppState>) -> Result<impl warp::Reply, warp::Rejection> {
    let llm_client = ComponentStatus::from_active(state.dispatcher.is_some());
    let identity_client = ComponentStatus::from_active(state.identity_active);
    debug!(?llm_client, ?identity_client, "health check");

    Ok(warp::reply::json(&HealthResponse {
        status: "healthy".to_string(),
        llm_client,
        identity_client,
        timestamp: Utc::now(),
    }))
}

pub async fn tools_status_handler(
    state: Arc<AppState>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&ToolsStatusResponse {
        tools: state.tools.clone(),
        tool_choice: ToolChoice::Auto.as_str().to_string(),
    }))
}
