//! Search service combining query construction, embedding and retrieval.

use serde_json::json;
use tracing::{debug, error, info};

use crate::config::{SearchSettings, StatisticsSettings};

use super::collections::{resolve_collections, Department, IndexKind};
use super::keywords::KeywordNormalizer;
use super::query::build_lexical_request;
use super::semantic::build_semantic_request;
use super::statistics::{
    calculate_statistics, calculate_supervisor_statistics, supervised_by, unique_supervisors,
    unique_years, StatisticsFilters, StatisticsResponse,
};
use super::traits::{Embedder, Result, Retriever};
use super::types::{
    QueryClause, RetrievalRequest, SearchHit, SearchParams, SemanticParams, ThesisDocument,
};

/// Request-scoped search and analytics facade.
///
/// # Type parameters
///
/// * `E` - embedding service boundary
/// * `R` - retrieval service boundary
pub struct SearchService<E, R>
where
    E: Embedder,
    R: Retriever,
{
    embedder: E,
    retriever: R,
    normalizer: KeywordNormalizer,
    search_settings: SearchSettings,
    statistics_settings: StatisticsSettings,
}

impl<E, R> SearchService<E, R>
where
    E: Embedder,
    R: Retriever,
{
    pub fn new(
        embedder: E,
        retriever: R,
        search_settings: SearchSettings,
        statistics_settings: StatisticsSettings,
    ) -> Self {
        Self {
            embedder,
            retriever,
            normalizer: KeywordNormalizer::default(),
            search_settings,
            statistics_settings,
        }
    }

    /// Create a service with default tuning.
    pub fn with_defaults(embedder: E, retriever: R) -> Self {
        Self::new(
            embedder,
            retriever,
            SearchSettings::default(),
            StatisticsSettings::default(),
        )
    }

    /// Replace the keyword canonicalization table.
    pub fn with_normalizer(mut self, normalizer: KeywordNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Lexical or phrase search over the regular collections.
    ///
    /// An empty query in non-phrase mode short-circuits to an empty result
    /// set without contacting the retrieval service.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<SearchHit>> {
        let Some(request) = build_lexical_request(params, &self.search_settings) else {
            debug!("empty lexical query, returning no hits");
            return Ok(Vec::new());
        };

        info!(
            collections = ?request.collections,
            phrase = params.phrase,
            supervisor_only = params.supervisor_only,
            "executing lexical search"
        );
        self.retriever.search(&request).await
    }

    /// Vector-similarity search over the semantic collections.
    ///
    /// An empty query short-circuits before the embedding service is called.
    pub async fn semantic_search(&self, params: &SemanticParams) -> Result<Vec<SearchHit>> {
        let query = params.query.trim();
        if query.is_empty() {
            debug!("empty semantic query, returning no hits");
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        let request = build_semantic_request(query_vector, params, &self.search_settings);

        info!(collections = ?request.collections, size = request.size, "executing semantic search");
        self.retriever.search(&request).await
    }

    /// Aggregate statistics for the corpus slice selected by `filters`.
    ///
    /// Failures are reported in the response envelope, never as a partial
    /// aggregate.
    pub async fn statistics(&self, filters: &StatisticsFilters) -> StatisticsResponse {
        if let Some(supervisor) = filters.supervisor.clone() {
            return self.supervisor_statistics(&supervisor, filters).await;
        }

        let mut filter = Vec::new();
        if let Some(department) = filters.department {
            filter.push(QueryClause::Term {
                field: "department".into(),
                value: json!(department.to_string()),
            });
        }
        if let Some(year) = filters.year {
            filter.push(QueryClause::Term {
                field: "year".into(),
                value: json!(year),
            });
        }

        let request = RetrievalRequest::new(
            resolve_collections(filters.department, IndexKind::Regular),
            QueryClause::filtered(filter),
            self.statistics_settings.scan_size,
        );

        match self.retriever.search(&request).await {
            Ok(hits) => {
                let documents = into_documents(hits);
                info!(documents = documents.len(), "computed corpus statistics");
                StatisticsResponse {
                    success: true,
                    total_documents: documents.len(),
                    statistics: calculate_statistics(
                        &documents,
                        &self.normalizer,
                        &self.statistics_settings,
                    ),
                    filters_applied: filters.clone(),
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "statistics retrieval failed");
                StatisticsResponse::failure(e.to_string(), filters.clone())
            }
        }
    }

    /// Supervisor-scoped statistics.
    ///
    /// Runs a deliberately broad candidate query (exact keyword term OR
    /// analyzed match), then re-verifies every candidate in-process with
    /// exact name equality; year and department act as secondary in-process
    /// filters because the broad call does not pre-filter on them.
    async fn supervisor_statistics(
        &self,
        supervisor: &str,
        filters: &StatisticsFilters,
    ) -> StatisticsResponse {
        let candidates_query = QueryClause::Bool {
            must: Vec::new(),
            should: vec![
                QueryClause::Term {
                    field: "supervisor.keyword".into(),
                    value: json!(supervisor),
                },
                QueryClause::Match {
                    field: "supervisor".into(),
                    query: supervisor.into(),
                    boost: 1.0,
                    minimum_should_match: None,
                },
            ],
            filter: Vec::new(),
            minimum_should_match: Some(1),
        };

        let request = RetrievalRequest::new(
            resolve_collections(filters.department, IndexKind::Regular),
            candidates_query,
            self.statistics_settings.scan_size,
        );

        match self.retriever.search(&request).await {
            Ok(hits) => {
                let candidates = hits.len();
                let documents: Vec<ThesisDocument> = into_documents(hits)
                    .into_iter()
                    .filter(|doc| supervised_by(doc, supervisor))
                    .filter(|doc| filters.year.is_none() || doc.year == filters.year)
                    .filter(|doc| match filters.department {
                        Some(department) => {
                            doc.department.as_deref() == Some(&department.to_string())
                        }
                        None => true,
                    })
                    .collect();

                info!(
                    supervisor,
                    candidates,
                    verified = documents.len(),
                    "supervisor statistics after exact re-verification"
                );

                StatisticsResponse {
                    success: true,
                    total_documents: documents.len(),
                    statistics: calculate_supervisor_statistics(
                        &documents,
                        supervisor,
                        &self.normalizer,
                        &self.statistics_settings,
                    ),
                    filters_applied: filters.clone(),
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, supervisor, "supervisor statistics retrieval failed");
                StatisticsResponse::failure(e.to_string(), filters.clone())
            }
        }
    }

    /// Distinct supervisor names for the filter dropdown, sorted ascending.
    pub async fn unique_supervisors(
        &self,
        department: Option<Department>,
        year: Option<i32>,
    ) -> Result<Vec<String>> {
        let mut filter = Vec::new();
        if let Some(dept) = department {
            filter.push(QueryClause::Term {
                field: "department".into(),
                value: json!(dept.to_string()),
            });
        }
        if let Some(year) = year {
            filter.push(QueryClause::Term {
                field: "year".into(),
                value: json!(year),
            });
        }

        let mut request = RetrievalRequest::new(
            resolve_collections(department, IndexKind::Regular),
            QueryClause::filtered(filter),
            self.statistics_settings.scan_size,
        );
        request.source_fields = Some(vec!["supervisor".into()]);

        let hits = self.retriever.search(&request).await?;
        Ok(unique_supervisors(&into_documents(hits)))
    }

    /// Distinct years for the filter dropdown, newest first.
    pub async fn unique_years(&self, department: Option<Department>) -> Result<Vec<i32>> {
        let filter = match department {
            Some(dept) => vec![QueryClause::Term {
                field: "department".into(),
                value: json!(dept.to_string()),
            }],
            None => Vec::new(),
        };

        let mut request = RetrievalRequest::new(
            resolve_collections(department, IndexKind::Regular),
            QueryClause::filtered(filter),
            self.statistics_settings.scan_size,
        );
        request.source_fields = Some(vec!["year".into()]);

        let hits = self.retriever.search(&request).await?;
        Ok(unique_years(&into_documents(hits)))
    }
}

fn into_documents(hits: Vec<SearchHit>) -> Vec<ThesisDocument> {
    hits.into_iter().map(|hit| hit.source).collect()
}
