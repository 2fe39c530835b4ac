//! API route configuration

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::handlers::{self, AppState};
use crate::{config::ServerConfig, middleware::cors_layer};

/// Build the complete API router with middleware
pub fn build_router(app_state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/api/chat", post(handlers::chat))
        .route("/api/completion", post(handlers::completion))
        .route("/api/models", get(handlers::list_models))
        .route("/api/embedding", post(handlers::embedding))
        .route("/api/embeddings/batch", post(handlers::batch_embeddings))
        .route("/api/embeddings/similarity", post(handlers::similarity))
        // Batches of 2048 texts can exceed axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(server.max_body_size_bytes()))
                .layer(cors_layer(&server.cors_allowed_origins)),
        )
        .with_state(app_state)
}
