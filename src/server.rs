//! HTTP server bootstrap

use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    api::{build_router, AppState},
    config::Config,
    error::Result,
    provider::{LlmProvider, OpenAiClient},
    shutdown::shutdown_signal,
};

/// Build the application router backed by the real provider client
pub fn create_app(config: &Config) -> Result<Router> {
    if config.provider.api_key_missing() {
        warn!("OPENAI_API_KEY is not set; provider calls will fail until it is configured");
    }

    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiClient::new(config.provider.clone())?);
    Ok(build_router(AppState::new(provider), &config.server))
}

/// Start HTTP server and serve until a shutdown signal arrives
pub async fn start_server(addr: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
