//! `EmbeddingProvider` over an OpenAI-compatible `/embeddings` HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cv_domain::error::{Error, Result};
use cv_domain::ports::EmbeddingProvider;

/// Connection details for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token sent as `Authorization: Bearer <api_key>`.
    pub api_key: String,
    /// Model identifier sent in each request.
    pub model: String,
    /// Output vector dimensionality for `model`.
    pub dimensions: usize,
    /// Request timeout.
    pub timeout: Duration,
}

/// Embeds text batches over HTTP, via an OpenAI-compatible provider.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    config: HttpEmbeddingConfig,
}

impl HttpEmbeddingProvider {
    /// Builds a provider, failing only if the underlying HTTP client can't
    /// be constructed (e.g. an invalid TLS configuration).
    pub fn new(config: HttpEmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::provider_with_source("failed to build HTTP client", e))?;
        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| Error::provider_with_source("embedding request failed", e))?;

        if !response.status().is_success() {
            return Err(Error::provider(format!(
                "embedding endpoint returned {}",
                response.status()
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::provider_with_source("failed to decode embedding response", e))?;

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}
