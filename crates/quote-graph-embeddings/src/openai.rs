//! OpenAI-compatible embedding provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use quote_graph_core::config::EmbeddingConfig;
use quote_graph_core::error::{CoreError, CoreResult};
use quote_graph_core::traits::EmbeddingProvider;
use quote_graph_core::types::EmbeddingVector;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Embedding provider backed by any OpenAI-compatible `/embeddings`
/// endpoint.
///
/// Requests are chunked to `batch_size` texts; each chunk is
/// all-or-nothing, and result rows are reordered by the response
/// `index` field so output always matches input order.
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    dimensions: usize,
    batch_size: usize,
    request_timeout: Duration,
}

impl OpenAiEmbeddingProvider {
    /// Build a provider from the embedding section of the application
    /// config. Fails if no API key is configured.
    pub fn from_config(config: &EmbeddingConfig) -> CoreResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CoreError::Config(
                    "embedding.api_key is not set (QUOTE_GRAPH__EMBEDDING__API_KEY)".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CoreError::Provider(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    async fn embed_chunk(&self, chunk: &[String]) -> CoreResult<Vec<EmbeddingVector>> {
        let url = format!("{}/embeddings", self.api_base);
        let request = EmbeddingRequest {
            model: &self.model,
            input: chunk,
            encoding_format: "float",
        };

        let response = timeout(
            self.request_timeout,
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send(),
        )
        .await
        .map_err(|_| {
            CoreError::Provider(format!(
                "embedding request timed out after {}s",
                self.request_timeout.as_secs()
            ))
        })?
        .map_err(|e| CoreError::Provider(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<unreadable body>"));
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CoreError::Provider(format!(
                "embedding API returned {status}: {message}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Provider(format!("malformed embedding response: {e}")))?;

        if parsed.data.len() != chunk.len() {
            return Err(CoreError::Provider(format!(
                "embedding API returned {} vectors for {} inputs",
                parsed.data.len(),
                chunk.len()
            )));
        }

        let mut rows = parsed.data;
        rows.sort_by_key(|row| row.index);
        let mut vectors = Vec::with_capacity(rows.len());
        for row in rows {
            if row.embedding.len() != self.dimensions {
                return Err(CoreError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: row.embedding.len(),
                });
            }
            vectors.push(row.embedding);
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> CoreResult<EmbeddingVector> {
        let mut vectors = self.embed_chunk(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| CoreError::Provider("embedding API returned no vectors".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> CoreResult<Vec<EmbeddingVector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            let chunk_vectors = self.embed_chunk(chunk).await?;
            vectors.extend(chunk_vectors);
            debug!(
                embedded = vectors.len(),
                total = texts.len(),
                "embedding batch progress"
            );
        }
        Ok(vectors)
    }
}
