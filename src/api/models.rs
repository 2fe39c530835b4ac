//! Request and response bodies of the public HTTP API

use serde::{Deserialize, Serialize};

use crate::provider::{EmbeddingsResponse, Usage};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_ENCODING_FORMAT: &str = "float";
pub const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 100;

/// Token budget for chat replies
pub const CHAT_MAX_TOKENS: u32 = 500;

/// Sampling temperature for legacy completions
pub const COMPLETION_TEMPERATURE: f32 = 0.7;

pub const NO_CHAT_RESPONSE: &str = "No response generated";
pub const NO_COMPLETION_RESPONSE: &str = "No completion generated";

/// Request to `POST /api/chat`
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub model: Option<String>,
}

/// Request to `POST /api/completion`
#[derive(Debug, Default, Deserialize)]
pub struct CompletionRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Request to `POST /api/embedding`
#[derive(Debug, Default, Deserialize)]
pub struct EmbeddingRequest {
    pub text: Option<String>,
    pub model: Option<String>,
    pub encoding_format: Option<String>,
}

/// Request to `POST /api/embeddings/batch`
#[derive(Debug, Default, Deserialize)]
pub struct BatchEmbeddingRequest {
    /// Kept as raw JSON so a non-array reports the batch validation message
    pub texts: Option<serde_json::Value>,
    pub model: Option<String>,
}

/// Request to `POST /api/embeddings/similarity`
#[derive(Debug, Default, Deserialize)]
pub struct SimilarityRequest {
    pub text1: Option<String>,
    pub text2: Option<String>,
    pub model: Option<String>,
}

/// Response from `GET /`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub timestamp: String,
}

/// Response from chat and completion routes
#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub model: String,
}

/// Projection of a provider model entry
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub created: i64,
    pub owned_by: String,
}

/// Response from `GET /api/models`
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelSummary>,
}

/// Response from `POST /api/embedding`; wraps the provider payload unchanged
#[derive(Debug, Serialize)]
pub struct EmbeddingResponse {
    pub embedding: EmbeddingsResponse,
}

/// One entry of a batch embedding response
#[derive(Debug, Serialize)]
pub struct BatchEmbeddingItem {
    pub index: usize,
    pub text: String,
    pub embedding: Vec<f64>,
    pub dimensions: usize,
}

/// Response from `POST /api/embeddings/batch`
#[derive(Debug, Serialize)]
pub struct BatchEmbeddingResponse {
    pub embeddings: Vec<BatchEmbeddingItem>,
    pub usage: Usage,
    pub model: String,
    pub total_embeddings: usize,
}

/// Vector plus its length
#[derive(Debug, Serialize)]
pub struct EmbeddingSummary {
    pub embedding: Vec<f64>,
    pub dimensions: usize,
}

impl From<Vec<f64>> for EmbeddingSummary {
    fn from(embedding: Vec<f64>) -> Self {
        Self {
            dimensions: embedding.len(),
            embedding,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimilarityEmbeddings {
    pub text1: EmbeddingSummary,
    pub text2: EmbeddingSummary,
}

/// Response from `POST /api/embeddings/similarity`
#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub text1: String,
    pub text2: String,
    pub cosine_similarity: f64,
    pub similarity_percentage: String,
    pub embeddings: SimilarityEmbeddings,
    pub usage: Usage,
    pub model: String,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
