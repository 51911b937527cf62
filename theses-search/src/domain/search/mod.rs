//! Thesis search and analytics.
//!
//! This module provides the search core for a corpus of academic theses:
//!
//! - **Lexical and phrase search** over abstracts, keywords and authors,
//!   with per-field boosts and supervisor-only mode
//! - **Semantic search** via abstract embeddings and cosine similarity
//! - **Corpus statistics** (per-year, per-department, per-supervisor
//!   breakdowns, keyword clouds, recency windows)
//!
//! # Architecture
//!
//! The core is built around trait abstractions for testability:
//!
//! - [`Embedder`] - query embedding generation (HTTP model server, mocks)
//! - [`Retriever`] - retrieval engine boundary (Elasticsearch, mocks)
//!
//! # Example
//!
//! ```ignore
//! use theses_search::config::read_config;
//! use theses_search::domain::search::embedder::LazyEmbedder;
//! use theses_search::domain::search::retriever::ElasticRetriever;
//! use theses_search::domain::search::{SearchParams, SearchService};
//!
//! let settings = read_config()?;
//! let embedder = LazyEmbedder::new(settings.embedder);
//! let retriever = ElasticRetriever::new(&settings.elasticsearch)?;
//! let service = SearchService::new(
//!     embedder,
//!     retriever,
//!     settings.search,
//!     settings.statistics,
//! );
//!
//! let hits = service
//!     .search(&SearchParams {
//!         query: "machine learning".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

mod collections;
mod fields;
mod keywords;
mod query;
mod semantic;
mod service;
mod statistics;
mod stopwords;
mod traits;
mod types;

pub mod embedder;
pub mod retriever;

pub use collections::{resolve_collections, Department, IndexKind};
pub use fields::FieldValue;
pub use keywords::KeywordNormalizer;
pub use service::SearchService;
pub use statistics::{
    CloudEntry, KeywordCount, StatisticsFilters, StatisticsResponse, SupervisorCount,
    ThesisStatistics, ThesisSummary, YearRange,
};
pub use stopwords::remove_stop_words;
pub use traits::{Embedder, Result, Retriever, SearchError};
pub use types::{
    SearchHit, SearchParams, SemanticParams, SortOrder, ThesisDocument,
};
