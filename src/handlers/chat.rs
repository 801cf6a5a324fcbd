// POST /chat handler

use std::sync::Arc;

use tracing::{error, info};
use warp::http::StatusCode;
use warp::Reply;

use crate::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::state::AppState;

pub const LLM_NOT_INITIALIZED: &str = "LLM client not initialized";
pub const CHAT_FAILED: &str = "Error processing request";

pub async fn chat_handler(
    state: Arc<AppState>,
    request: ChatRequest,
) -> Result<warp::reply::Response, warp::Rejection> {
    let user_id = request.user_id();
    info!(user_id, message_len = request.message.len(), "chat message received");

    let Some(dispatcher) = state.dispatcher.as_ref() else {
        error!("chat requested but no LLM provider is configured");
        return Ok(error_reply(LLM_NOT_INITIALIZED));
    };

    match dispatcher.handle(&request.message, user_id).await {
        Ok(reply) => Ok(warp::reply::json(&ChatResponse::from(reply)).into_response()),
        Err(e) => {
            error!(user_id, error = %e, error_debug = ?e, "chat turn failed");
            Ok(error_reply(CHAT_FAILED))
        }
    }
}

fn error_reply(detail: &str) -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse::new(detail)),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response()
}
