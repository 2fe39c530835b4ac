//! JSON body extractor with gateway error semantics

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ApiError;
use crate::middleware::ValidationError;

/// Typed JSON body.
///
/// An empty body is read as `{}` so missing required fields surface as the
/// route's own validation message. Schema mismatches are reported as 400.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body).map(ApiJson).map_err(|e| {
            warn!("Rejected request body: {}", e);
            ValidationError::MalformedBody(e.to_string()).into()
        })
    }
}
