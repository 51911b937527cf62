//! Trait definitions for the external service boundaries.
//!
//! The retrieval engine and the embedding model are remote black boxes;
//! these traits let the core be exercised against mocks.

use async_trait::async_trait;

use super::types::{RetrievalRequest, SearchHit};

/// Error type for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("embedding generation failed: {0}")]
    Embedding(String),

    #[error("retrieval service error: {0}")]
    Retrieval(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Retrieval(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Boundary to the retrieval service.
///
/// Accepts a structured query plus target collections and returns the ranked
/// hit list. The engine's storage and indexing lifecycle are not this
/// crate's concern.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<SearchHit>>;
}

/// Boundary to the embedding model.
///
/// Deterministic for identical input; returns a fixed-dimension vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimensions(&self) -> usize;
}
