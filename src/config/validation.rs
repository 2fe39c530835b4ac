//! Configuration validation

use super::*;
use crate::error::{GatewayError, Result};

/// Accepted log formats
const LOG_FORMATS: [&str; 3] = ["json", "compact", "pretty"];

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_provider_config(&config.provider)?;
    validate_server_config(&config.server)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validate provider configuration.
///
/// A missing API key is not an error here; the gateway starts and reports it.
fn validate_provider_config(config: &ProviderConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(GatewayError::Config(
            "Provider base URL cannot be empty".to_string()
        ));
    }

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(GatewayError::Config(
            "Provider base URL must start with http:// or https://".to_string()
        ));
    }

    if let Some(timeout) = config.timeout_secs {
        if timeout == 0 {
            return Err(GatewayError::Config(
                "Provider timeout must be greater than 0 (omit it to disable)".to_string()
            ));
        }

        if timeout > 600 {
            return Err(GatewayError::Config(
                "Provider timeout too large (max: 600 seconds)".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate server configuration
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(GatewayError::Config(
            "Server port cannot be 0".to_string()
        ));
    }

    if config.host.is_empty() {
        return Err(GatewayError::Config(
            "Server host cannot be empty".to_string()
        ));
    }

    if config.max_body_size_mb == 0 || config.max_body_size_mb > 100 {
        return Err(GatewayError::Config(
            "Max body size must be between 1 and 100 MB".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if !LOG_FORMATS.contains(&config.format.as_str()) {
        return Err(GatewayError::Config(
            format!("Unknown log format '{}' (expected one of: {})", config.format, LOG_FORMATS.join(", "))
        ));
    }

    Ok(())
}
