//! Error types for the gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Result type alias for calls into the upstream provider
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the LLM provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-success status; `message` is the provider's own error message
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("The OPENAI_API_KEY environment variable is missing or empty")]
    MissingApiKey,
}

impl ProviderError {
    /// Message surfaced to callers under `details`
    pub fn details(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }

    /// HTTP status returned by the provider, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        GatewayError::Config(err.to_string())
    }
}
