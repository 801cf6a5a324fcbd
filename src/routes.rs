// Route definitions

use std::convert::Infallible;
use std::sync::Arc;

use reqwest::Url;
use tracing::warn;
use warp::Filter;

use crate::handlers;
use crate::state::AppState;

/// Largest chat body accepted
const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn configure_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // GET /
    let root = warp::path::end()
        .and(warp::get())
        .and_then(handlers::root_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::health_handler);

    // GET /tools/status
    let tools_status = warp::path("tools")
        .and(warp::path("status"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::tools_status_handler);

    // POST /chat
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(handlers::chat_handler);

    root.or(health).or(tools_status).or(chat)
}

/// Routes wrapped with CORS for `origins` and request logging
pub fn configure_app(
    state: Arc<AppState>,
    origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let origins = valid_origins(origins);
    let cors = warp::cors()
        .allow_origins(origins.iter().map(String::as_str))
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"])
        .allow_credentials(true);

    configure_routes(state)
        .with(cors)
        .with(warp::log("support_bot::http"))
}

fn with_state(state: Arc<AppState>) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Normalise configured origins to `scheme://host[:port]`, skipping bad ones
pub fn valid_origins(origins: &[String]) -> Vec<String> {
    origins
        .iter()
        .filter_map(|origin| match normalize_origin(origin) {
            Some(normalized) => Some(normalized),
            None => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

fn normalize_origin(origin: &str) -> Option<String> {
    let url = Url::parse(origin).ok()?;
    if !matches!(url.scheme(), "http" | "https")
        || url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return None;
    }
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}
