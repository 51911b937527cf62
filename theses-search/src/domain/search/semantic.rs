//! Semantic (vector-similarity) query construction.
//!
//! Candidates are scored by cosine similarity between the query vector and
//! each document's precomputed abstract vector, shifted by +1.0 so ranking
//! scores stay non-negative. Semantic and lexical search are independent
//! ranking strategies over the same corpus; their scores are never fused.

use serde_json::json;

use crate::config::SearchSettings;

use super::collections::{resolve_collections, IndexKind};
use super::types::{QueryClause, RetrievalRequest, SemanticParams, SortSpec};

/// Field holding the document embedding in the semantic collections.
pub const VECTOR_FIELD: &str = "abstract_vector";

/// Compose the similarity-scored retrieval request for an already-embedded
/// query. Year filters apply before scoring; the department selector routes
/// to the semantic collections rather than filtering.
pub fn build_semantic_request(
    query_vector: Vec<f32>,
    params: &SemanticParams,
    settings: &SearchSettings,
) -> RetrievalRequest {
    let mut filter = Vec::new();
    if let Some(year) = params.year {
        filter.push(QueryClause::Term {
            field: "year".into(),
            value: json!(year),
        });
    }

    let size = params
        .limit
        .unwrap_or(settings.semantic_default_limit)
        .clamp(1, settings.semantic_max_limit);

    let sort = match params.sort {
        Some(order) => vec![SortSpec::score(), SortSpec::year(order)],
        None => Vec::new(),
    };

    RetrievalRequest {
        collections: resolve_collections(params.department, IndexKind::Semantic),
        query: QueryClause::Similarity {
            field: VECTOR_FIELD.into(),
            vector: query_vector,
            filter,
        },
        sort,
        highlight: Vec::new(),
        size,
        source_fields: None,
    }
}
