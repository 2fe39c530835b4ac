//! Configuration loader with environment variable support

use super::Config;
use crate::error::Result;
use config::{Environment, File};
use std::path::Path;
use tracing::debug;

/// Prefix for structured environment overrides, e.g. `LLM_GATEWAY__SERVER__PORT`
pub const ENV_PREFIX: &str = "LLM_GATEWAY";

/// Load configuration from defaults, an optional TOML file and the environment.
///
/// Precedence, lowest first: serde defaults, the file (skipped if absent),
/// `LLM_GATEWAY__*` variables, then `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `PORT`.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        debug!("Reading configuration file {}", path.as_ref().display());
        builder = builder.add_source(File::from(path.as_ref()).required(false));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_allowed_origins"),
        )
        .set_override_option("provider.api_key", env_value("OPENAI_API_KEY"))?
        .set_override_option("provider.base_url", env_value("OPENAI_BASE_URL"))?
        .set_override_option("server.port", env_value("PORT"))?
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    Ok(cfg)
}

/// Read an environment variable, treating blank values as unset
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
