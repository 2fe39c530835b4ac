//! LLM Gateway Server Binary
//!
//! Loads configuration, initialises logging and serves the gateway API.

use llm_gateway::{config::Config, observability::init_observability, server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(Some(&config_path))?;

    init_observability(&config.logging);

    info!("Starting LLM Gateway");
    info!("Configuration loaded (file: {}, provider: {})", config_path, config.provider.base_url);

    let app = server::create_app(&config)?;
    server::start_server(&config.server.bind_address(), app).await?;

    Ok(())
}
