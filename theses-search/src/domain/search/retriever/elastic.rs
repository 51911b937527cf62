//! Elasticsearch retriever implementation.
//!
//! Translates the abstract retrieval request into the Elasticsearch query
//! DSL over HTTP. The engine's storage and indexing lifecycle are managed
//! elsewhere; this client only searches.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::ElasticsearchSettings;
use crate::domain::search::traits::{Result, Retriever, SearchError};
use crate::domain::search::types::{
    QueryClause, RetrievalRequest, SearchHit, SortField, SortOrder, SortSpec, ThesisDocument,
};

#[derive(Clone)]
pub struct ElasticRetriever {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl ElasticRetriever {
    pub fn new(settings: &ElasticsearchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_owned(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    /// True when the cluster answers on its root endpoint.
    pub async fn ping(&self) -> bool {
        self.client
            .get(&self.base_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Retriever for ElasticRetriever {
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<SearchHit>> {
        let url = format!(
            "{}/{}/_search",
            self.base_url,
            request.collections.join(",")
        );
        let body = search_body(request);
        debug!(%url, "sending retrieval request");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SearchError::Retrieval(format!(
                "search returned {status}: {detail}"
            )));
        }

        let parsed: EsResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Retrieval(format!("malformed search response: {e}")))?;

        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                // Sorted responses may omit the relevance score.
                score: hit.score.unwrap_or(0.0),
                source: hit.source,
                highlight: hit.highlight,
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct EsResponse {
    hits: EsHits,
}

#[derive(Deserialize)]
struct EsHits {
    hits: Vec<EsHit>,
}

#[derive(Deserialize)]
struct EsHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: ThesisDocument,
    #[serde(default)]
    highlight: HashMap<String, Vec<String>>,
}

/// Render the full `_search` request body.
fn search_body(request: &RetrievalRequest) -> Value {
    let mut body = Map::new();
    body.insert("query".into(), query_value(&request.query));
    body.insert("size".into(), json!(request.size));

    if !request.sort.is_empty() {
        let sort: Vec<Value> = request.sort.iter().map(sort_value).collect();
        body.insert("sort".into(), Value::Array(sort));
    }

    if !request.highlight.is_empty() {
        let fields: Map<String, Value> = request
            .highlight
            .iter()
            .map(|field| (field.clone(), json!({})))
            .collect();
        body.insert("highlight".into(), json!({ "fields": fields }));
    }

    if let Some(fields) = &request.source_fields {
        body.insert("_source".into(), json!(fields));
    }

    Value::Object(body)
}

fn query_value(clause: &QueryClause) -> Value {
    match clause {
        QueryClause::MatchAll => json!({ "match_all": {} }),
        QueryClause::Term { field, value } => json!({ "term": { field.clone(): value } }),
        QueryClause::Match {
            field,
            query,
            boost,
            minimum_should_match,
        } => {
            let mut options = Map::new();
            options.insert("query".into(), json!(query));
            options.insert("boost".into(), json!(boost));
            if let Some(percent) = minimum_should_match {
                options.insert(
                    "minimum_should_match".into(),
                    json!(format!("{percent}%")),
                );
            }
            json!({ "match": { field.clone(): Value::Object(options) } })
        }
        QueryClause::MatchPhrase {
            field,
            phrase,
            boost,
        } => json!({
            "match_phrase": { field.clone(): { "query": phrase, "boost": boost } }
        }),
        QueryClause::Bool {
            must,
            should,
            filter,
            minimum_should_match,
        } => {
            let mut inner = Map::new();
            if !must.is_empty() {
                inner.insert(
                    "must".into(),
                    Value::Array(must.iter().map(query_value).collect()),
                );
            }
            if !should.is_empty() {
                inner.insert(
                    "should".into(),
                    Value::Array(should.iter().map(query_value).collect()),
                );
            }
            if !filter.is_empty() {
                inner.insert(
                    "filter".into(),
                    Value::Array(filter.iter().map(query_value).collect()),
                );
            }
            if let Some(min) = minimum_should_match {
                inner.insert("minimum_should_match".into(), json!(min));
            }
            json!({ "bool": Value::Object(inner) })
        }
        QueryClause::Similarity {
            field,
            vector,
            filter,
        } => {
            let scored = QueryClause::filtered(filter.clone());
            json!({
                "script_score": {
                    "query": query_value(&scored),
                    "script": {
                        "source": format!(
                            "cosineSimilarity(params.query_vector, '{field}') + 1.0"
                        ),
                        "params": { "query_vector": vector }
                    }
                }
            })
        }
    }
}

fn sort_value(spec: &SortSpec) -> Value {
    match spec.field {
        SortField::Score => json!("_score"),
        SortField::Year => {
            let order = match spec.order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            };
            json!({ "year": { "order": order } })
        }
    }
}
