//! LLM Gateway - a thin HTTP facade over an OpenAI-compatible LLM API
//!
//! Every route forwards to the provider once and reshapes the result. The one
//! local computation is cosine similarity between two embeddings.
//!
//! ## Routes
//!
//! - `GET /`: service status
//! - `POST /api/chat`: single-turn chat completion
//! - `POST /api/completion`: legacy text completion
//! - `GET /api/models`: model listing
//! - `POST /api/embedding`: single embedding, provider payload as-is
//! - `POST /api/embeddings/batch`: up to 2048 embeddings aligned with the input
//! - `POST /api/embeddings/similarity`: cosine similarity of two texts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_gateway::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_env()?;
//!     let app = llm_gateway::server::create_app(&config)?;
//!     llm_gateway::server::start_server(&config.server.bind_address(), app).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod provider;
pub mod server;
pub mod shutdown;
pub mod similarity;

pub use config::Config;
pub use error::{GatewayError, ProviderError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{build_router, ApiError, AppState};
    pub use crate::config::Config;
    pub use crate::error::{GatewayError, ProviderError, ProviderResult, Result};
    pub use crate::middleware::{InputValidator, ValidationError};
    pub use crate::provider::{LlmProvider, OpenAiClient};
    pub use crate::similarity::cosine_similarity;
}
