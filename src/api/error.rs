//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::models::ErrorResponse;
use crate::error::ProviderError;
use crate::middleware::ValidationError;

/// Error returned from API handlers.
///
/// Validation failures become 400 `{error}`; provider failures become
/// 500 `{error, details}` where `error` names the failed operation.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    /// Wrap a provider failure under a route-specific message
    pub fn provider(context: &str, err: ProviderError) -> Self {
        match err.status() {
            Some(status) => error!("{}: {} (provider status {})", context, err, status),
            None => error!("{}: {}", context, err),
        }
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: context.to_string(),
                details: Some(err.details()),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: err.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
