//! HTTP embedder implementation.
//!
//! Talks to a sentence-embedding model server over HTTP. The model is
//! deterministic, so identical input text always yields the same vector.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EmbedderSettings;
use crate::domain::search::traits::{Embedder, Result, SearchError};

#[derive(Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(settings: &EmbedderSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        Ok(Self {
            client,
            url: settings.url.trim_end_matches('/').to_owned(),
            model: settings.model.clone(),
            dimensions: settings.dimensions,
        })
    }

    /// Create the embedder and warm up the model with one request, so the
    /// first real query does not pay the model load time.
    pub async fn connect(settings: &EmbedderSettings) -> Result<Self> {
        let embedder = Self::new(settings)?;
        embedder.embed("warmup").await?;
        info!(model = %embedder.model, "embedding model ready");
        Ok(embedder)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Ok(vec![0.0; self.dimensions]);
        }

        let response = self
            .client
            .post(format!("{}/embed", self.url))
            .json(&EmbedRequest {
                model: &self.model,
                text,
            })
            .send()
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SearchError::Embedding(format!(
                "model server returned {status}: {detail}"
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Embedding(format!("malformed embedding response: {e}")))?;

        if parsed.embedding.len() != self.dimensions {
            return Err(SearchError::Embedding(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                parsed.embedding.len()
            )));
        }

        Ok(parsed.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
