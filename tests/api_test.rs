//! Router-level tests driven by a stub provider
//!
//! The stub records every call so tests can assert that validation failures
//! never reach the provider.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use llm_gateway::{
    api::{build_router, AppState},
    config::ServerConfig,
    error::{ProviderError, ProviderResult},
    provider::{
        models::{ChatChoice, ChatMessage, ChatRole, CompletionChoice},
        ChatCompletionRequest, ChatCompletionResponse, CompletionRequest, CompletionResponse,
        EmbeddingData, EmbeddingInput, EmbeddingVector, EmbeddingsRequest, EmbeddingsResponse,
        LlmProvider, Model, ModelList, Usage,
    },
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

#[derive(Default)]
struct StubProvider {
    calls: AtomicUsize,
    fail_with: Option<String>,
    chat_content: Option<String>,
    completion_text: Option<String>,
    vectors: Vec<Vec<f64>>,
    last_chat: Mutex<Option<ChatCompletionRequest>>,
    last_completion: Mutex<Option<CompletionRequest>>,
    last_embeddings: Mutex<Option<EmbeddingsRequest>>,
}

impl StubProvider {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> ProviderResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(ProviderError::Api {
                status: 401,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn usage() -> Usage {
        Usage {
            prompt_tokens: 7,
            completion_tokens: Some(3),
            total_tokens: 10,
        }
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> ProviderResult<ChatCompletionResponse> {
        self.check()?;
        *self.last_chat.lock().unwrap() = Some(request.clone());
        Ok(ChatCompletionResponse {
            id: "chatcmpl-stub".to_string(),
            model: format!("{}-0125", request.model),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage {
                    role: ChatRole::Assistant,
                    content: self.chat_content.clone(),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(Self::usage()),
        })
    }

    async fn completion(&self, request: &CompletionRequest) -> ProviderResult<CompletionResponse> {
        self.check()?;
        *self.last_completion.lock().unwrap() = Some(request.clone());
        Ok(CompletionResponse {
            id: "cmpl-stub".to_string(),
            model: request.model.clone(),
            choices: vec![CompletionChoice {
                text: self.completion_text.clone(),
                index: 0,
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(Self::usage()),
        })
    }

    async fn list_models(&self) -> ProviderResult<ModelList> {
        self.check()?;
        Ok(ModelList {
            object: "list".to_string(),
            data: vec![
                Model {
                    id: "gpt-4".to_string(),
                    object: "model".to_string(),
                    created: 1687882411,
                    owned_by: "openai".to_string(),
                },
                Model {
                    id: "text-embedding-ada-002".to_string(),
                    object: "model".to_string(),
                    created: 1671217299,
                    owned_by: "openai-internal".to_string(),
                },
            ],
        })
    }

    async fn create_embeddings(&self, request: &EmbeddingsRequest) -> ProviderResult<EmbeddingsResponse> {
        self.check()?;
        *self.last_embeddings.lock().unwrap() = Some(request.clone());

        let count = match &request.input {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(texts) => texts.len(),
        };
        let data = (0..count)
            .map(|index| EmbeddingData {
                object: "embedding".to_string(),
                index,
                embedding: EmbeddingVector::Float(
                    self.vectors
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| vec![index as f64, 1.0, 0.5]),
                ),
            })
            .collect();

        Ok(EmbeddingsResponse {
            object: "list".to_string(),
            data,
            model: request.model.clone(),
            usage: Usage {
                prompt_tokens: count as u32,
                completion_tokens: None,
                total_tokens: count as u32,
            },
        })
    }
}

fn app(provider: Arc<StubProvider>) -> Router {
    build_router(AppState::new(provider), &ServerConfig::default())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_status_route() {
    let stub = Arc::new(StubProvider::default());
    let (status, body) = send(app(stub.clone()), "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("running"));
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_chat_uses_defaults() {
    let stub = Arc::new(StubProvider {
        chat_content: Some("Hi there!".to_string()),
        ..Default::default()
    });
    let (status, body) = send(app(stub.clone()), "POST", "/api/chat", Some(json!({ "message": "Hello" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hi there!");
    assert_eq!(body["model"], "gpt-3.5-turbo-0125");
    assert_eq!(body["usage"]["total_tokens"], 10);

    let request = stub.last_chat.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, "gpt-3.5-turbo");
    assert_eq!(request.max_tokens, Some(500));
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, ChatRole::User);
    assert_eq!(request.messages[0].content.as_deref(), Some("Hello"));
}

#[tokio::test]
async fn test_chat_honours_model_and_placeholder() {
    let stub = Arc::new(StubProvider::default());
    let (status, body) = send(
        app(stub.clone()),
        "POST",
        "/api/chat",
        Some(json!({ "message": "Hello", "model": "gpt-4" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "No response generated");
    assert_eq!(stub.last_chat.lock().unwrap().as_ref().unwrap().model, "gpt-4");
}

#[tokio::test]
async fn test_chat_requires_message() {
    let stub = Arc::new(StubProvider::default());

    for payload in [json!({}), json!({ "model": "gpt-4" }), json!({ "message": "" }), json!({ "message": null })] {
        let (status, body) = send(app(stub.clone()), "POST", "/api/chat", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Message is required" }));
    }

    let (status, _) = send(app(stub.clone()), "POST", "/api/chat", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let stub = Arc::new(StubProvider::default());

    let (status, body) = send(app(stub.clone()), "POST", "/api/chat", Some(json!({ "message": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let (status, body) = send(app(stub.clone()), "POST", "/api/embeddings/batch", Some(json!({ "texts": "one" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Texts array is required and must not be empty");

    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_completion_defaults_and_trim() {
    let stub = Arc::new(StubProvider {
        completion_text: Some("\n\n  The capital is Paris.  ".to_string()),
        ..Default::default()
    });
    let (status, body) = send(
        app(stub.clone()),
        "POST",
        "/api/completion",
        Some(json!({ "prompt": "Capital of France?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "The capital is Paris.");
    assert_eq!(body["model"], "gpt-3.5-turbo-instruct");

    let request = stub.last_completion.lock().unwrap().clone().unwrap();
    assert_eq!(request.max_tokens, Some(100));
    assert_eq!(request.temperature, Some(0.7));
}

#[tokio::test]
async fn test_completion_custom_max_tokens_and_placeholder() {
    let stub = Arc::new(StubProvider {
        completion_text: Some("   ".to_string()),
        ..Default::default()
    });
    let (status, body) = send(
        app(stub.clone()),
        "POST",
        "/api/completion",
        Some(json!({ "prompt": "Say nothing", "max_tokens": 16 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "No completion generated");
    assert_eq!(stub.last_completion.lock().unwrap().as_ref().unwrap().max_tokens, Some(16));
}

#[tokio::test]
async fn test_completion_requires_prompt() {
    let stub = Arc::new(StubProvider::default());
    let (status, body) = send(app(stub.clone()), "POST", "/api/completion", Some(json!({ "max_tokens": 5 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_models_projection_preserves_order() {
    let stub = Arc::new(StubProvider::default());
    let (status, body) = send(app(stub), "GET", "/api/models", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "models": [
                { "id": "gpt-4", "created": 1687882411, "owned_by": "openai" },
                { "id": "text-embedding-ada-002", "created": 1671217299, "owned_by": "openai-internal" }
            ]
        })
    );
}

#[tokio::test]
async fn test_single_embedding_passes_provider_payload_through() {
    let stub = Arc::new(StubProvider::default());
    let (status, body) = send(app(stub.clone()), "POST", "/api/embedding", Some(json!({ "text": "hello" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embedding"]["object"], "list");
    assert_eq!(body["embedding"]["model"], "text-embedding-ada-002");
    assert_eq!(body["embedding"]["data"][0]["embedding"], json!([0.0, 1.0, 0.5]));

    let request = stub.last_embeddings.lock().unwrap().clone().unwrap();
    assert_eq!(request.input, EmbeddingInput::Single("hello".to_string()));
    assert_eq!(request.encoding_format.as_deref(), Some("float"));
}

#[tokio::test]
async fn test_single_embedding_requires_text() {
    let stub = Arc::new(StubProvider::default());
    let (status, body) = send(app(stub.clone()), "POST", "/api/embedding", Some(json!({ "model": "m" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text is required");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_batch_embeddings_aligned_with_input() {
    let stub = Arc::new(StubProvider::default());
    let texts = vec!["first", "second", "third"];
    let (status, body) = send(
        app(stub.clone()),
        "POST",
        "/api/embeddings/batch",
        Some(json!({ "texts": texts })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_embeddings"], 3);
    assert_eq!(body["model"], "text-embedding-ada-002");
    assert_eq!(body["usage"]["prompt_tokens"], 3);

    let items = body["embeddings"].as_array().unwrap();
    assert_eq!(items.len(), texts.len());
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item["index"], i);
        assert_eq!(item["text"], texts[i]);
        assert_eq!(item["dimensions"], 3);
    }
}

#[tokio::test]
async fn test_batch_size_bounds() {
    let stub = Arc::new(StubProvider::default());

    let (status, body) = send(app(stub.clone()), "POST", "/api/embeddings/batch", Some(json!({ "texts": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Texts array is required and must not be empty");

    let (status, _) = send(app(stub.clone()), "POST", "/api/embeddings/batch", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_many: Vec<String> = (0..2049).map(|i| format!("text {}", i)).collect();
    let (status, body) = send(app(stub.clone()), "POST", "/api/embeddings/batch", Some(json!({ "texts": too_many }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Maximum 2048 texts allowed per batch");

    assert_eq!(stub.calls(), 0);

    let max: Vec<String> = (0..2048).map(|i| format!("text {}", i)).collect();
    let (status, body) = send(app(stub.clone()), "POST", "/api/embeddings/batch", Some(json!({ "texts": max }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_embeddings"], 2048);
    assert_eq!(body["embeddings"][2047]["text"], "text 2047");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_similarity_computes_cosine() {
    let stub = Arc::new(StubProvider {
        vectors: vec![vec![1.0, 0.0], vec![1.0, 1.0]],
        ..Default::default()
    });
    let (status, body) = send(
        app(stub.clone()),
        "POST",
        "/api/embeddings/similarity",
        Some(json!({ "text1": "cat", "text2": "kitten" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text1"], "cat");
    assert_eq!(body["text2"], "kitten");

    let score = body["cosine_similarity"].as_f64().unwrap();
    assert!((score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    assert_eq!(body["similarity_percentage"], "70.71%");
    assert_eq!(body["embeddings"]["text1"]["embedding"], json!([1.0, 0.0]));
    assert_eq!(body["embeddings"]["text2"]["dimensions"], 2);
    assert_eq!(body["model"], "text-embedding-ada-002");

    let request = stub.last_embeddings.lock().unwrap().clone().unwrap();
    assert_eq!(request.input, EmbeddingInput::Batch(vec!["cat".to_string(), "kitten".to_string()]));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_similarity_with_zero_vector_is_nan() {
    let stub = Arc::new(StubProvider {
        vectors: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
        ..Default::default()
    });
    let (status, body) = send(
        app(stub),
        "POST",
        "/api/embeddings/similarity",
        Some(json!({ "text1": "a", "text2": "b" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["cosine_similarity"].is_null());
    assert_eq!(body["similarity_percentage"], "NaN%");
}

#[tokio::test]
async fn test_similarity_requires_both_texts() {
    let stub = Arc::new(StubProvider::default());

    for payload in [json!({ "text1": "a" }), json!({ "text2": "b" }), json!({})] {
        let (status, body) = send(app(stub.clone()), "POST", "/api/embeddings/similarity", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Both text1 and text2 are required");
    }

    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_maps_to_internal_error() {
    let cases = [
        ("POST", "/api/chat", Some(json!({ "message": "hi" })), "Failed to get chat response"),
        ("POST", "/api/completion", Some(json!({ "prompt": "hi" })), "Failed to get completion"),
        ("GET", "/api/models", None, "Failed to fetch models"),
        ("POST", "/api/embedding", Some(json!({ "text": "hi" })), "Failed to create embedding"),
        ("POST", "/api/embeddings/batch", Some(json!({ "texts": ["hi"] })), "Failed to create batch embeddings"),
        (
            "POST",
            "/api/embeddings/similarity",
            Some(json!({ "text1": "a", "text2": "b" })),
            "Failed to calculate similarity",
        ),
    ];

    for (method, uri, payload, message) in cases {
        let stub = Arc::new(StubProvider::failing("Incorrect API key provided"));
        let (status, body) = send(app(stub.clone()), method, uri, payload).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body["error"], message);
        assert_eq!(body["details"], "Incorrect API key provided");
        assert_eq!(stub.calls(), 1);
    }
}

#[tokio::test]
async fn test_provider_failure_without_message() {
    let stub = Arc::new(StubProvider::failing(""));
    let (status, body) = send(app(stub), "GET", "/api/models", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"], "Unknown error");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let stub = Arc::new(StubProvider::default());
    let response = app(stub.clone())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let stub = Arc::new(StubProvider::default());
    let server = ServerConfig {
        max_body_size_mb: 1,
        ..ServerConfig::default()
    };
    let router = build_router(AppState::new(stub.clone()), &server);

    let payload = json!({ "message": "x".repeat(2 * 1024 * 1024) }).to_string();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .header("content-length", payload.len())
                .header("origin", "http://localhost:5173")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(stub.calls(), 0);
}
