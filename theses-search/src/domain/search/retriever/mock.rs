//! In-memory retriever for tests.
//!
//! Interprets the structured retrieval request over a small corpus so
//! cross-mode semantics (phrase vs. analyzed match, filters before scoring,
//! similarity ranking) can be asserted without a running engine.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::search::traits::{Result, Retriever, SearchError};
use crate::domain::search::types::{
    QueryClause, RetrievalRequest, SearchHit, SortField, SortOrder, ThesisDocument,
};

#[derive(Clone, Default)]
pub struct MockRetriever {
    documents: Arc<RwLock<Vec<(String, ThesisDocument)>>>,
    fail_with: Arc<RwLock<Option<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed documents into one collection.
    pub fn with_documents(self, collection: &str, docs: Vec<ThesisDocument>) -> Self {
        {
            let mut documents = self.documents.write().unwrap();
            for doc in docs {
                documents.push((collection.to_owned(), doc));
            }
        }
        self
    }

    /// Make every search fail with the given message.
    pub fn failing(message: &str) -> Self {
        let mock = Self::default();
        *mock.fail_with.write().unwrap() = Some(message.to_owned());
        mock
    }

    /// Number of search calls received.
    pub fn call_count(&self) -> usize {
        self.call_count.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<SearchHit>> {
        self.call_count.fetch_add(1, AtomicOrdering::SeqCst);

        if let Some(message) = self.fail_with.read().unwrap().as_ref() {
            return Err(SearchError::Retrieval(message.clone()));
        }

        let documents = self.documents.read().unwrap();
        let mut hits: Vec<SearchHit> = documents
            .iter()
            .enumerate()
            .filter(|(_, (collection, _))| request.collections.contains(collection))
            .filter_map(|(index, (_, doc))| {
                evaluate(doc, &request.query).map(|score| SearchHit {
                    id: doc
                        .hash_code
                        .map(|h| h.to_string())
                        .unwrap_or_else(|| index.to_string()),
                    score,
                    source: doc.clone(),
                    highlight: highlight(doc, request, &request.query),
                })
            })
            .collect();

        sort_hits(&mut hits, request);
        hits.truncate(request.size);
        Ok(hits)
    }
}

/// Evaluate a clause against one document; `None` means no match.
fn evaluate(doc: &ThesisDocument, clause: &QueryClause) -> Option<f64> {
    match clause {
        QueryClause::MatchAll => Some(1.0),
        QueryClause::Term { field, value } => {
            let matches = match field.as_str() {
                "year" => value.as_i64().map(|v| v as i32) == doc.year,
                "department" => value.as_str() == doc.department.as_deref(),
                "hash_code" => value.as_i64() == doc.hash_code,
                // Keyword sub-field: exact match on any stored element.
                "supervisor.keyword" => value
                    .as_str()
                    .map(|wanted| doc.supervisor.values().iter().any(|s| s == wanted))
                    .unwrap_or(false),
                _ => false,
            };
            matches.then_some(1.0)
        }
        QueryClause::Match {
            field,
            query,
            boost,
            minimum_should_match,
        } => {
            let text = field_text(doc, field)?.to_lowercase();
            let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
            if tokens.is_empty() {
                return None;
            }
            let matched = tokens.iter().filter(|t| text.contains(t.as_str())).count();
            if matched == 0 {
                return None;
            }
            if let Some(percent) = minimum_should_match {
                if matched * 100 < tokens.len() * usize::from(*percent) {
                    return None;
                }
            }
            Some(f64::from(*boost) * matched as f64 / tokens.len() as f64)
        }
        QueryClause::MatchPhrase {
            field,
            phrase,
            boost,
        } => {
            let text = field_text(doc, field)?.to_lowercase();
            text.contains(&phrase.to_lowercase())
                .then_some(f64::from(*boost))
        }
        QueryClause::Bool {
            must,
            should,
            filter,
            minimum_should_match,
        } => {
            for clause in filter {
                evaluate(doc, clause)?;
            }

            let mut score = 0.0;
            for clause in must {
                score += evaluate(doc, clause)?;
            }

            let matching_should: Vec<f64> = should
                .iter()
                .filter_map(|clause| evaluate(doc, clause))
                .collect();
            let required = minimum_should_match
                .unwrap_or(u32::from(must.is_empty() && !should.is_empty()))
                as usize;
            if matching_should.len() < required {
                return None;
            }
            score += matching_should.iter().sum::<f64>();

            Some(score)
        }
        QueryClause::Similarity { vector, filter, .. } => {
            for clause in filter {
                evaluate(doc, clause)?;
            }
            let doc_vector = doc.abstract_vector.as_ref()?;
            Some(cosine_similarity(vector, doc_vector) + 1.0)
        }
    }
}

fn field_text(doc: &ThesisDocument, field: &str) -> Option<String> {
    match field {
        "abstract" => doc.abstract_text.clone(),
        "author" => doc.author.clone(),
        "keywords" => Some(doc.keywords.joined()).filter(|s| !s.is_empty()),
        "supervisor" => Some(doc.supervisor.joined()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Emit the matched field text as a single highlight fragment.
fn highlight(
    doc: &ThesisDocument,
    request: &RetrievalRequest,
    clause: &QueryClause,
) -> HashMap<String, Vec<String>> {
    let mut fragments = HashMap::new();
    let terms = collect_terms(clause);

    for field in &request.highlight {
        let Some(text) = field_text(doc, field) else {
            continue;
        };
        let lowered = text.to_lowercase();
        if terms.iter().any(|term| lowered.contains(term)) {
            fragments.insert(field.clone(), vec![text]);
        }
    }
    fragments
}

fn collect_terms(clause: &QueryClause) -> Vec<String> {
    match clause {
        QueryClause::Match { query, .. } => {
            query.split_whitespace().map(str::to_lowercase).collect()
        }
        QueryClause::MatchPhrase { phrase, .. } => vec![phrase.to_lowercase()],
        QueryClause::Bool {
            must,
            should,
            filter,
            ..
        } => must
            .iter()
            .chain(should)
            .chain(filter)
            .flat_map(collect_terms)
            .collect(),
        _ => Vec::new(),
    }
}

fn sort_hits(hits: &mut [SearchHit], request: &RetrievalRequest) {
    hits.sort_by(|a, b| {
        for spec in &request.sort {
            let ordering = match spec.field {
                SortField::Score => b
                    .score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal),
                SortField::Year => {
                    let (ya, yb) = (a.source.year, b.source.year);
                    match spec.order {
                        SortOrder::Asc => ya.cmp(&yb),
                        SortOrder::Desc => yb.cmp(&ya),
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        // Relevance ordering when no explicit sort is requested.
        if request.sort.is_empty() {
            b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
        } else {
            Ordering::Equal
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::fields::FieldValue;
    use crate::domain::search::types::SortSpec;
    use serde_json::json;

    fn doc(hash: i64, abstract_text: &str, year: i32) -> ThesisDocument {
        ThesisDocument {
            hash_code: Some(hash),
            author: Some("Author".into()),
            abstract_text: Some(abstract_text.to_owned()),
            year: Some(year),
            department: Some("cs".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn filters_by_collection() {
        let retriever = MockRetriever::new()
            .with_documents("cs_theses", vec![doc(1, "neural networks", 2023)])
            .with_documents("infos_theses", vec![doc(2, "neural networks", 2023)]);

        let request = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::MatchAll,
            100,
        );
        let hits = retriever.search(&request).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[tokio::test]
    async fn phrase_requires_consecutive_tokens() {
        let retriever = MockRetriever::new().with_documents(
            "cs_theses",
            vec![
                doc(1, "deep learning for images", 2023),
                doc(2, "learning about deep oceans", 2022),
            ],
        );

        let phrase = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::MatchPhrase {
                field: "abstract".into(),
                phrase: "deep learning".into(),
                boost: 1.0,
            },
            100,
        );
        let hits = retriever.search(&phrase).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        let loose = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::Match {
                field: "abstract".into(),
                query: "deep learning".into(),
                boost: 1.0,
                minimum_should_match: None,
            },
            100,
        );
        let hits = retriever.search(&loose).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn minimum_should_match_prunes_weak_matches() {
        let retriever = MockRetriever::new().with_documents(
            "cs_theses",
            vec![doc(1, "image segmentation networks", 2023)],
        );

        let request = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::Match {
                field: "abstract".into(),
                query: "image recognition pipelines networks".into(),
                boost: 1.0,
                minimum_should_match: Some(60),
            },
            100,
        );
        // Only 2 of 4 terms match: below the 60% floor.
        let hits = retriever.search(&request).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn term_filter_gates_the_bool_query() {
        let retriever = MockRetriever::new().with_documents(
            "cs_theses",
            vec![doc(1, "robots", 2023), doc(2, "robots", 2020)],
        );

        let request = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::Bool {
                must: vec![QueryClause::Match {
                    field: "abstract".into(),
                    query: "robots".into(),
                    boost: 1.0,
                    minimum_should_match: None,
                }],
                should: vec![],
                filter: vec![QueryClause::Term {
                    field: "year".into(),
                    value: json!(2023),
                }],
                minimum_should_match: None,
            },
            100,
        );
        let hits = retriever.search(&request).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source.year, Some(2023));
    }

    #[tokio::test]
    async fn similarity_ranks_by_shifted_cosine() {
        let mut near = doc(1, "a", 2023);
        near.abstract_vector = Some(vec![1.0, 0.0]);
        let mut far = doc(2, "b", 2023);
        far.abstract_vector = Some(vec![-1.0, 0.0]);
        let no_vector = doc(3, "c", 2023);

        let retriever = MockRetriever::new()
            .with_documents("cs_theses_semantic", vec![near, far, no_vector]);

        let request = RetrievalRequest::new(
            vec!["cs_theses_semantic".into()],
            QueryClause::Similarity {
                field: "abstract_vector".into(),
                vector: vec![1.0, 0.0],
                filter: vec![],
            },
            100,
        );
        let hits = retriever.search(&request).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "1");
        assert!((hits[0].score - 2.0).abs() < 1e-9);
        assert!(hits[1].score.abs() < 1e-9);
    }

    #[tokio::test]
    async fn year_sort_overrides_relevance() {
        let retriever = MockRetriever::new().with_documents(
            "cs_theses",
            vec![doc(1, "robots robots", 2020), doc(2, "robots", 2023)],
        );

        let mut request = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::Match {
                field: "abstract".into(),
                query: "robots".into(),
                boost: 1.0,
                minimum_should_match: None,
            },
            100,
        );
        request.sort = vec![SortSpec::year(SortOrder::Asc), SortSpec::score()];

        let hits = retriever.search(&request).await.unwrap();
        assert_eq!(hits[0].source.year, Some(2020));
        assert_eq!(hits[1].source.year, Some(2023));
    }

    #[tokio::test]
    async fn highlights_matched_fields() {
        let retriever = MockRetriever::new()
            .with_documents("cs_theses", vec![doc(1, "smart home automation", 2023)]);

        let mut request = RetrievalRequest::new(
            vec!["cs_theses".into()],
            QueryClause::Match {
                field: "abstract".into(),
                query: "smart".into(),
                boost: 1.0,
                minimum_should_match: None,
            },
            100,
        );
        request.highlight = vec!["abstract".into(), "keywords".into()];

        let hits = retriever.search(&request).await.unwrap();
        assert!(hits[0].highlight.contains_key("abstract"));
        assert!(!hits[0].highlight.contains_key("keywords"));
    }

    #[tokio::test]
    async fn failing_mock_surfaces_retrieval_error() {
        let retriever = MockRetriever::failing("cluster down");
        let request =
            RetrievalRequest::new(vec!["cs_theses".into()], QueryClause::MatchAll, 10);
        let err = retriever.search(&request).await.unwrap_err();
        assert!(err.to_string().contains("cluster down"));
    }

    #[tokio::test]
    async fn size_caps_results() {
        let docs: Vec<ThesisDocument> =
            (0..10).map(|i| doc(i, "robots", 2023)).collect();
        let retriever = MockRetriever::new().with_documents("cs_theses", docs);

        let request =
            RetrievalRequest::new(vec!["cs_theses".into()], QueryClause::MatchAll, 3);
        let hits = retriever.search(&request).await.unwrap();
        assert_eq!(hits.len(), 3);
    }
}
