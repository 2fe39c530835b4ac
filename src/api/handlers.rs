//! API request handlers

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    error::ApiError,
    extract::ApiJson,
    models::*,
};
use crate::{
    error::ProviderError,
    middleware::{InputValidator, ValidationError},
    provider::{self, EmbeddingsResponse, LlmProvider},
    similarity::{cosine_similarity, similarity_percentage},
};

const CHAT_FAILED: &str = "Failed to get chat response";
const COMPLETION_FAILED: &str = "Failed to get completion";
const MODELS_FAILED: &str = "Failed to fetch models";
const EMBEDDING_FAILED: &str = "Failed to create embedding";
const BATCH_FAILED: &str = "Failed to create batch embeddings";
const SIMILARITY_FAILED: &str = "Failed to calculate similarity";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LlmProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

/// Service status
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "LLM Gateway is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Single-turn chat completion
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    let model = req.model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
    let message = InputValidator::require_text(req.message, ValidationError::MissingMessage)?;

    info!("Chat request for model {}", model);
    let request = provider::ChatCompletionRequest::user_message(model, message)
        .with_max_tokens(CHAT_MAX_TOKENS);

    let response = state
        .provider
        .chat_completion(&request)
        .await
        .map_err(|e| ApiError::provider(CHAT_FAILED, e))?;

    Ok(Json(TextResponse {
        response: response.first_content().unwrap_or(NO_CHAT_RESPONSE).to_string(),
        usage: response.usage,
        model: response.model,
    }))
}

/// Legacy text completion
pub async fn completion(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CompletionRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    let model = req.model.unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string());
    let max_tokens = req.max_tokens.unwrap_or(DEFAULT_COMPLETION_MAX_TOKENS);
    let prompt = InputValidator::require_text(req.prompt, ValidationError::MissingPrompt)?;

    info!("Completion request for model {} (max_tokens={})", model, max_tokens);
    let request = provider::CompletionRequest::new(model, prompt)
        .with_max_tokens(max_tokens)
        .with_temperature(COMPLETION_TEMPERATURE);

    let response = state
        .provider
        .completion(&request)
        .await
        .map_err(|e| ApiError::provider(COMPLETION_FAILED, e))?;

    Ok(Json(TextResponse {
        response: response.first_text().unwrap_or(NO_COMPLETION_RESPONSE).to_string(),
        usage: response.usage,
        model: response.model,
    }))
}

/// Provider model listing, projected to `{id, created, owned_by}`
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let list = state
        .provider
        .list_models()
        .await
        .map_err(|e| ApiError::provider(MODELS_FAILED, e))?;

    let models = list
        .data
        .into_iter()
        .map(|m| ModelSummary {
            id: m.id,
            created: m.created,
            owned_by: m.owned_by,
        })
        .collect();

    Ok(Json(ModelsResponse { models }))
}

/// Single embedding; the provider payload is returned as-is
pub async fn embedding(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, ApiError> {
    let model = req.model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    let encoding_format = req
        .encoding_format
        .unwrap_or_else(|| DEFAULT_ENCODING_FORMAT.to_string());
    let text = InputValidator::require_text(req.text, ValidationError::MissingText)?;

    let request = provider::EmbeddingsRequest::single(model, text).with_encoding_format(encoding_format);

    let embedding = state
        .provider
        .create_embeddings(&request)
        .await
        .map_err(|e| ApiError::provider(EMBEDDING_FAILED, e))?;

    Ok(Json(EmbeddingResponse { embedding }))
}

/// Batch embeddings aligned with the input texts
pub async fn batch_embeddings(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BatchEmbeddingRequest>,
) -> Result<Json<BatchEmbeddingResponse>, ApiError> {
    let model = req.model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    let texts = InputValidator::validate_batch(req.texts)?;

    info!("Batch embedding request: {} texts, model {}", texts.len(), model);
    let request = provider::EmbeddingsRequest::batch(model, texts.clone())
        .with_encoding_format(DEFAULT_ENCODING_FORMAT);

    let response = state
        .provider
        .create_embeddings(&request)
        .await
        .map_err(|e| ApiError::provider(BATCH_FAILED, e))?;

    let usage = response.usage.clone();
    let model = response.model.clone();
    let embeddings = align_embeddings(&texts, response).map_err(|e| ApiError::provider(BATCH_FAILED, e))?;

    Ok(Json(BatchEmbeddingResponse {
        total_embeddings: embeddings.len(),
        embeddings,
        usage,
        model,
    }))
}

/// Cosine similarity between two texts, embedded in one provider call
pub async fn similarity(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let model = req.model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    let (text1, text2) = InputValidator::require_pair(req.text1, req.text2)?;

    let request = provider::EmbeddingsRequest::batch(model, vec![text1.clone(), text2.clone()])
        .with_encoding_format(DEFAULT_ENCODING_FORMAT);

    let response = state
        .provider
        .create_embeddings(&request)
        .await
        .map_err(|e| ApiError::provider(SIMILARITY_FAILED, e))?;

    let usage = response.usage.clone();
    let model = response.model.clone();
    let mut vectors = align_embeddings(&[text1.clone(), text2.clone()], response)
        .map_err(|e| ApiError::provider(SIMILARITY_FAILED, e))?
        .into_iter()
        .map(|item| item.embedding);

    let (first, second) = match (vectors.next(), vectors.next()) {
        (Some(first), Some(second)) => (first, second),
        _ => {
            return Err(ApiError::provider(
                SIMILARITY_FAILED,
                ProviderError::InvalidResponse("expected two embeddings".to_string()),
            ))
        }
    };

    let score = cosine_similarity(&first, &second);
    debug!("Cosine similarity {} for model {}", score, model);

    Ok(Json(SimilarityResponse {
        text1,
        text2,
        cosine_similarity: score,
        similarity_percentage: similarity_percentage(score),
        embeddings: SimilarityEmbeddings {
            text1: first.into(),
            text2: second.into(),
        },
        usage,
        model,
    }))
}

/// Order provider embeddings by index and pair each with its input text
fn align_embeddings(
    texts: &[String],
    response: EmbeddingsResponse,
) -> Result<Vec<BatchEmbeddingItem>, ProviderError> {
    let mut data = response.data;
    if data.len() != texts.len() {
        return Err(ProviderError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            texts.len(),
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);

    data.into_iter()
        .zip(texts)
        .enumerate()
        .map(|(position, (d, text))| {
            if d.index != position {
                return Err(ProviderError::InvalidResponse(format!(
                    "embedding index {} out of range or duplicated",
                    d.index
                )));
            }
            let embedding = d.embedding.into_floats().ok_or_else(|| {
                ProviderError::InvalidResponse("expected float embeddings".to_string())
            })?;

            Ok(BatchEmbeddingItem {
                index: d.index,
                text: text.clone(),
                dimensions: embedding.len(),
                embedding,
            })
        })
        .collect()
}
