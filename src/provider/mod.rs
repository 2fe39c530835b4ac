//! Upstream LLM provider access

pub mod client;
pub mod models;

pub use client::OpenAiClient;
pub use models::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionRequest, CompletionResponse,
    EmbeddingData, EmbeddingInput, EmbeddingVector, EmbeddingsRequest, EmbeddingsResponse,
    Model, ModelList, Usage,
};

use async_trait::async_trait;
use crate::error::ProviderResult;

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Create a chat completion
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> ProviderResult<ChatCompletionResponse>;

    /// Create a legacy text completion
    async fn completion(&self, request: &CompletionRequest) -> ProviderResult<CompletionResponse>;

    /// List the models available to the configured key
    async fn list_models(&self) -> ProviderResult<ModelList>;

    /// Generate embeddings for one or more inputs
    async fn create_embeddings(&self, request: &EmbeddingsRequest) -> ProviderResult<EmbeddingsResponse>;
}
