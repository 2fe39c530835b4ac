//! HTTP client for the OpenAI-compatible provider API

use super::{models::*, LlmProvider};
use crate::config::ProviderConfig;
use crate::error::{GatewayError, ProviderError, ProviderResult, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the provider's chat, completion, model and embedding endpoints.
///
/// Built once at startup and shared read-only; each call is a single attempt.
pub struct OpenAiClient {
    config: ProviderConfig,
    http_client: Client,
}

impl OpenAiClient {
    /// Create a new provider client
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut client_builder = Client::builder().pool_max_idle_per_host(10);

        if let Some(timeout) = config.timeout_secs {
            client_builder = client_builder.timeout(Duration::from_secs(timeout));
        }

        let http_client = client_builder
            .build()
            .map_err(|e| GatewayError::Provider(ProviderError::Network(e)))?;

        info!(
            "Initialized provider client for {} (timeout: {:?})",
            config.base_url, config.timeout_secs
        );

        Ok(Self::with_http_client(config, http_client))
    }

    /// Create client with custom HTTP client
    pub fn with_http_client(config: ProviderConfig, http_client: Client) -> Self {
        if config.api_key_missing() {
            warn!("Provider client created without an API key; requests will fail");
        }

        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach authentication headers, failing locally when no key is configured
    fn authorize(&self, builder: RequestBuilder) -> ProviderResult<RequestBuilder> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let mut builder = builder.bearer_auth(api_key);
        if let Some(organization) = &self.config.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }
        Ok(builder)
    }

    /// Send one request and decode the JSON response
    async fn send<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> ProviderResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("Provider request: {} {}", method, url);

        let mut builder = self.authorize(self.http_client.request(method, &url))?;
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ProviderError::Network)?;

        let status = response.status();
        let text = response.text().await.map_err(ProviderError::Network)?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()));
        }

        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => body.error.message,
            Err(_) => text,
        };
        debug!("Provider returned {}", status);

        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> ProviderResult<ChatCompletionResponse> {
        self.send(Method::POST, "chat/completions", Some(request)).await
    }

    async fn completion(&self, request: &CompletionRequest) -> ProviderResult<CompletionResponse> {
        self.send(Method::POST, "completions", Some(request)).await
    }

    async fn list_models(&self) -> ProviderResult<ModelList> {
        self.send::<(), _>(Method::GET, "models", None).await
    }

    async fn create_embeddings(&self, request: &EmbeddingsRequest) -> ProviderResult<EmbeddingsResponse> {
        let response: EmbeddingsResponse = self.send(Method::POST, "embeddings", Some(request)).await?;
        debug!("Received {} embeddings", response.data.len());
        Ok(response)
    }
}
