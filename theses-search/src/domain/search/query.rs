//! Lexical and phrase query construction.
//!
//! Builds the structured retrieval request for keyword/boolean matching over
//! {abstract, keywords, author}, or over the supervisor field alone. Keyword
//! matches are boosted above the abstract baseline and author matches
//! down-weighted below it; in non-phrase mode the abstract additionally
//! requires a tunable share of the remaining terms to match, so partially
//! relevant abstracts still surface.

use serde_json::json;

use crate::config::SearchSettings;

use super::collections::{resolve_collections, IndexKind};
use super::stopwords::remove_stop_words;
use super::types::{QueryClause, RetrievalRequest, SearchParams, SortSpec};

const KEYWORDS_BOOST: f32 = 2.0;
const ABSTRACT_BOOST: f32 = 1.0;
const AUTHOR_BOOST: f32 = 0.5;

/// Compose the retrieval request for a lexical or phrase search.
///
/// Returns `None` when the trimmed query is empty: the caller must
/// short-circuit to an empty result set without contacting the retrieval
/// service.
pub fn build_lexical_request(
    params: &SearchParams,
    settings: &SearchSettings,
) -> Option<RetrievalRequest> {
    let query_text = params.query.trim();
    if query_text.is_empty() {
        return None;
    }

    let clause = if params.supervisor_only {
        supervisor_clause(query_text, params.phrase)
    } else {
        content_clause(query_text, params.phrase, settings)
    };

    let mut filter = Vec::new();
    if let Some(year) = params.year {
        filter.push(QueryClause::Term {
            field: "year".into(),
            value: json!(year),
        });
    }

    let query = merge_filter(clause, filter);

    let sort = match params.sort {
        Some(order) => vec![SortSpec::year(order), SortSpec::score()],
        None => vec![SortSpec::score()],
    };

    let highlight: Vec<String> = if params.supervisor_only {
        vec!["supervisor".into()]
    } else {
        vec!["abstract".into(), "keywords".into()]
    };

    Some(RetrievalRequest {
        collections: resolve_collections(params.department, IndexKind::Regular),
        query,
        sort,
        highlight,
        size: settings.page_size,
        source_fields: None,
    })
}

/// Match over {abstract, keywords, author}: the phrase must appear in at
/// least one field, or (non-phrase) a should-clause match across all three.
fn content_clause(query_text: &str, phrase: bool, settings: &SearchSettings) -> QueryClause {
    let should = if phrase {
        vec![
            QueryClause::MatchPhrase {
                field: "abstract".into(),
                phrase: query_text.into(),
                boost: ABSTRACT_BOOST,
            },
            QueryClause::MatchPhrase {
                field: "keywords".into(),
                phrase: query_text.into(),
                boost: KEYWORDS_BOOST,
            },
            QueryClause::MatchPhrase {
                field: "author".into(),
                phrase: query_text.into(),
                boost: AUTHOR_BOOST,
            },
        ]
    } else {
        let filtered = remove_stop_words(query_text);
        vec![
            QueryClause::Match {
                field: "abstract".into(),
                query: filtered.clone(),
                boost: ABSTRACT_BOOST,
                minimum_should_match: Some(settings.abstract_min_should_match),
            },
            QueryClause::Match {
                field: "keywords".into(),
                query: filtered.clone(),
                boost: KEYWORDS_BOOST,
                minimum_should_match: None,
            },
            QueryClause::Match {
                field: "author".into(),
                query: filtered,
                boost: AUTHOR_BOOST,
                minimum_should_match: None,
            },
        ]
    };

    QueryClause::Bool {
        must: Vec::new(),
        should,
        filter: Vec::new(),
        minimum_should_match: Some(1),
    }
}

/// Match solely against the supervisor field.
fn supervisor_clause(query_text: &str, phrase: bool) -> QueryClause {
    let must = if phrase {
        QueryClause::MatchPhrase {
            field: "supervisor".into(),
            phrase: query_text.into(),
            boost: 1.0,
        }
    } else {
        // OR semantics across the surviving tokens.
        QueryClause::Match {
            field: "supervisor".into(),
            query: remove_stop_words(query_text),
            boost: 1.0,
            minimum_should_match: None,
        }
    };

    QueryClause::Bool {
        must: vec![must],
        should: Vec::new(),
        filter: Vec::new(),
        minimum_should_match: None,
    }
}

fn merge_filter(clause: QueryClause, extra_filter: Vec<QueryClause>) -> QueryClause {
    if extra_filter.is_empty() {
        return clause;
    }
    match clause {
        QueryClause::Bool {
            must,
            should,
            mut filter,
            minimum_should_match,
        } => {
            filter.extend(extra_filter);
            QueryClause::Bool {
                must,
                should,
                filter,
                minimum_should_match,
            }
        }
        other => QueryClause::Bool {
            must: vec![other],
            should: Vec::new(),
            filter: extra_filter,
            minimum_should_match: None,
        },
    }
}
