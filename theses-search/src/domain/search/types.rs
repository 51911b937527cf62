//! Core types for the thesis search domain.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::collections::Department;
use super::fields::FieldValue;

/// One academic thesis record, as stored by the retrieval service.
///
/// Documents are produced by an external ingestion pipeline and are strictly
/// read-only here. `hash_code` is the public reference key (a digest of the
/// normalized title), never the retrieval service's internal id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThesisDocument {
    #[serde(default)]
    pub hash_code: Option<i64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub supervisor: FieldValue,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: FieldValue,
    /// Fixed-dimension embedding of the abstract, present only in the
    /// semantic collections. Opaque except as a similarity operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_vector: Option<Vec<f32>>,
}

/// One ranked hit returned by the retrieval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    pub source: ThesisDocument,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub highlight: HashMap<String, Vec<String>>,
}

/// Year sort direction. Relevance ordering applies when no order is given.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parameters of a lexical or phrase search request.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub year: Option<i32>,
    pub sort: Option<SortOrder>,
    /// Require the query to match as one consecutive token sequence.
    pub phrase: bool,
    pub department: Option<Department>,
    /// Match only against the supervisor field.
    pub supervisor_only: bool,
}

/// Parameters of a semantic (vector-similarity) search request.
#[derive(Debug, Clone, Default)]
pub struct SemanticParams {
    pub query: String,
    pub year: Option<i32>,
    pub department: Option<Department>,
    pub sort: Option<SortOrder>,
    /// Result count; defaults to the configured limit, capped at the max.
    pub limit: Option<usize>,
}

/// Structured query tree handed to the retrieval service.
///
/// This is the whole contract with the engine: boolean must/should/filter
/// composition, analyzed and phrase matches with per-field boosts, exact
/// term filters, and a similarity-scoring clause.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    MatchAll,
    /// Exact-value filter on a structured field.
    Term {
        field: String,
        value: serde_json::Value,
    },
    /// Analyzed match with OR semantics across tokens.
    Match {
        field: String,
        query: String,
        boost: f32,
        /// Percentage of tokens required to match, when set.
        minimum_should_match: Option<u8>,
    },
    /// Consecutive exact token sequence match.
    MatchPhrase {
        field: String,
        phrase: String,
        boost: f32,
    },
    Bool {
        must: Vec<QueryClause>,
        should: Vec<QueryClause>,
        filter: Vec<QueryClause>,
        minimum_should_match: Option<u32>,
    },
    /// Cosine similarity against a stored vector, shifted by +1.0 so all
    /// scores are non-negative. Filters apply before scoring.
    Similarity {
        field: String,
        vector: Vec<f32>,
        filter: Vec<QueryClause>,
    },
}

impl QueryClause {
    /// A bool query carrying only filter clauses (match-all when empty).
    pub fn filtered(filter: Vec<QueryClause>) -> Self {
        if filter.is_empty() {
            QueryClause::MatchAll
        } else {
            QueryClause::Bool {
                must: Vec::new(),
                should: Vec::new(),
                filter,
                minimum_should_match: None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Year,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn year(order: SortOrder) -> Self {
        Self {
            field: SortField::Year,
            order,
        }
    }

    pub fn score() -> Self {
        Self {
            field: SortField::Score,
            order: SortOrder::Desc,
        }
    }
}

/// A complete retrieval request: target collections plus query, ordering,
/// highlighting and size directives.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    pub collections: Vec<String>,
    pub query: QueryClause,
    pub sort: Vec<SortSpec>,
    pub highlight: Vec<String>,
    pub size: usize,
    /// Restrict returned stored fields, for scans that need only a few.
    pub source_fields: Option<Vec<String>>,
}

impl RetrievalRequest {
    pub fn new(collections: Vec<String>, query: QueryClause, size: usize) -> Self {
        Self {
            collections,
            query,
            sort: Vec::new(),
            highlight: Vec::new(),
            size,
            source_fields: None,
        }
    }
}
