use std::sync::Arc;

use anyhow::Context;
use support_bot::config::AppConfig;
use support_bot::dispatch::{build_registry, Dispatcher};
use support_bot::identity::{
    IdentityOperations, ReqwestTransport, SailPointApi, ToolClient, UnconfiguredIdentity,
};
use support_bot::llm::create_provider;
use support_bot::routes::configure_app;
use support_bot::state::AppState;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("loading configuration")?;
    support_bot::init_tracing(&config.log_level, &config.log_format)?;
    info!(?config, "starting support bot");

    let identity_active = config.identity_configured();
    let identity: Arc<dyn IdentityOperations> = if identity_active {
        let transport = Arc::new(ReqwestTransport::new().context("building HTTP client")?);
        let api = SailPointApi::connect(config.take_identity_credentials(), transport).await;
        if api.is_authenticated().await {
            info!("SailPoint API authenticated");
        } else {
            warn!("SailPoint authentication failed at startup; will retry on first use");
        }
        Arc::new(ToolClient::new(Arc::new(api)))
    } else {
        warn!("SAILPOINT_API_URL, SAILPOINT_CLIENT_ID or SAILPOINT_CLIENT_SECRET not set; identity tools disabled");
        Arc::new(UnconfiguredIdentity)
    };

    let registry = build_registry(identity).context("registering tools")?;
    let tools: Vec<String> = registry.names().into_iter().map(str::to_string).collect();
    info!(?tools, "tools registered");

    let dispatcher = if config.llm_configured() {
        let model = config.model()?;
        match create_provider(model.clone(), config.provider_access()).await {
            Ok(provider) => {
                info!(model = model.as_str(), "LLM provider initialized");
                Some(Dispatcher::new(
                    provider,
                    Box::new(registry),
                    config.generation_config(),
                ))
            }
            Err(e) => {
                error!(error = %e, "failed to initialize LLM provider");
                None
            }
        }
    } else {
        warn!(provider = ?config.llm_provider, "LLM credentials not set; chat disabled");
        None
    };

    let addr = config.socket_addr()?;
    let state = AppState::new(dispatcher, identity_active, tools);
    let app = configure_app(state, &config.allowed_origins());

    info!(%addr, "listening");
    warp::serve(app).run(addr).await;

    Ok(())
}
