//! Lazily initialized embedder.
//!
//! The model server loads its weights on the first request, which is slow.
//! This wrapper defers that cost until the first embedding is actually
//! needed and then reuses the warmed-up client for every later call.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::EmbedderSettings;
use crate::domain::search::traits::{Embedder, Result};

use super::HttpEmbedder;

pub struct LazyEmbedder {
    settings: EmbedderSettings,
    cell: OnceCell<HttpEmbedder>,
}

impl LazyEmbedder {
    pub fn new(settings: EmbedderSettings) -> Self {
        Self {
            settings,
            cell: OnceCell::new(),
        }
    }

    /// The inner embedder, warmed up exactly once across concurrent callers.
    async fn inner(&self) -> Result<&HttpEmbedder> {
        self.cell
            .get_or_try_init(|| HttpEmbedder::connect(&self.settings))
            .await
    }
}

#[async_trait]
impl Embedder for LazyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.inner().await?.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.settings.dimensions
    }
}
