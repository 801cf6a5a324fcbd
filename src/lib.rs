// HTTP server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub mod config;

// Chat turn dispatch and the support tool catalog
pub mod dispatch;

// IdentityIQ client and the restricted facade tools use
pub mod identity;

// LLM abstraction layer
pub mod llm;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `level`. `format` is `text` or `json`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(level: &str, format: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => subscriber.with(fmt::layer().json()).try_init()?,
        _ => subscriber.with(fmt::layer()).try_init()?,
    }

    Ok(())
}
