//! Corpus statistics aggregation.
//!
//! Counts are computed in-process from a retrieved document batch. Keyword
//! counts go through extraction and canonicalization first; supervisor
//! counts use extraction and trimming only, so the dropdown names match the
//! stored spelling. The supervisor-scoped path re-verifies fuzzy retrieval
//! candidates with exact string equality before anything is counted.

use std::collections::{BTreeMap, HashMap, HashSet};

use itertools::Itertools;
use serde::Serialize;

use crate::config::StatisticsSettings;

use super::collections::Department;
use super::keywords::KeywordNormalizer;
use super::types::ThesisDocument;

const TOP_SUPERVISORS: usize = 20;
const TOP_KEYWORDS: usize = 15;
const KEYWORD_CLOUD_SIZE: usize = 50;

/// Filters a statistics request was made with; echoed back in the response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsFilters {
    pub department: Option<Department>,
    pub year: Option<i32>,
    pub supervisor: Option<String>,
}

/// Envelope for a statistics request: either a full aggregate or an explicit
/// failure with zeroed statistics. Partial aggregates are never returned.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub total_documents: usize,
    pub statistics: ThesisStatistics,
    pub filters_applied: StatisticsFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatisticsResponse {
    pub fn failure(message: String, filters: StatisticsFilters) -> Self {
        Self {
            success: false,
            total_documents: 0,
            statistics: ThesisStatistics::default(),
            filters_applied: filters,
            error: Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupervisorCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub term: String,
    pub count: usize,
}

/// Word-cloud entry, sized by occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudEntry {
    pub text: String,
    pub value: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

/// Abbreviated document record listed under `recent_theses`.
#[derive(Debug, Clone, Serialize)]
pub struct ThesisSummary {
    pub author: String,
    pub year: Option<i32>,
    pub department: Option<String>,
    pub supervisor: Vec<String>,
    pub hash_code: Option<i64>,
}

impl ThesisSummary {
    fn from_document(doc: &ThesisDocument) -> Self {
        Self {
            author: doc.author.clone().unwrap_or_else(|| "Unknown".to_owned()),
            year: doc.year,
            department: doc.department.clone(),
            supervisor: doc.supervisor.values(),
            hash_code: doc.hash_code,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ThesisStatistics {
    /// Count per year, keys ascending.
    pub by_year: BTreeMap<i32, usize>,
    pub by_department: HashMap<String, usize>,
    /// Count per individual supervisor name, top entries by count.
    pub by_supervisor: Vec<SupervisorCount>,
    pub top_keywords: Vec<KeywordCount>,
    pub keyword_cloud_data: Vec<CloudEntry>,
    pub year_range: YearRange,
    pub average_abstract_length: usize,
    pub supervisors_count: usize,
    pub recent_theses: Vec<ThesisSummary>,
}

/// Exact-match re-verification for supervisor-scoped statistics.
///
/// The broad retrieval pass matches analyzed tokens, so "Antal Margit" also
/// surfaces documents supervised only by "Antal Margit Zsolt". A candidate
/// survives only when one of its extracted supervisor values equals the
/// requested name exactly (after trim).
pub fn supervised_by(doc: &ThesisDocument, supervisor: &str) -> bool {
    let wanted = supervisor.trim();
    doc.supervisor.values().iter().any(|name| name == wanted)
}

/// Compute corpus-wide statistics from a document batch.
pub fn calculate_statistics(
    documents: &[ThesisDocument],
    normalizer: &KeywordNormalizer,
    settings: &StatisticsSettings,
) -> ThesisStatistics {
    let mut stats = aggregate(documents, normalizer, settings, settings.recent_limit);

    let supervisor_counts = count_values(
        documents
            .iter()
            .flat_map(|doc| doc.supervisor.values()),
    );
    stats.supervisors_count = supervisor_counts.len();
    stats.by_supervisor = top_n(supervisor_counts, TOP_SUPERVISORS)
        .map(|(name, count)| SupervisorCount { name, count })
        .collect();

    stats
}

/// Compute statistics scoped to one supervisor's already re-verified batch.
pub fn calculate_supervisor_statistics(
    documents: &[ThesisDocument],
    supervisor: &str,
    normalizer: &KeywordNormalizer,
    settings: &StatisticsSettings,
) -> ThesisStatistics {
    let mut stats = aggregate(
        documents,
        normalizer,
        settings,
        settings.supervisor_recent_limit,
    );

    stats.supervisors_count = 1;
    stats.by_supervisor = vec![SupervisorCount {
        name: supervisor.to_owned(),
        count: documents.len(),
    }];

    stats
}

fn aggregate(
    documents: &[ThesisDocument],
    normalizer: &KeywordNormalizer,
    settings: &StatisticsSettings,
    recent_limit: usize,
) -> ThesisStatistics {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    let mut by_department: HashMap<String, usize> = HashMap::new();
    let mut keyword_counts: HashMap<String, usize> = HashMap::new();
    let mut abstract_lengths: Vec<usize> = Vec::new();

    for doc in documents {
        if let Some(year) = doc.year {
            *by_year.entry(year).or_default() += 1;
        }
        if let Some(department) = &doc.department {
            *by_department.entry(department.clone()).or_default() += 1;
        }
        for keyword in normalizer.normalize_field(&doc.keywords) {
            *keyword_counts.entry(keyword).or_default() += 1;
        }
        if let Some(abstract_text) = &doc.abstract_text {
            if !abstract_text.is_empty() {
                abstract_lengths.push(abstract_text.chars().count());
            }
        }
    }

    let year_range = YearRange {
        min: by_year.keys().next().copied(),
        max: by_year.keys().next_back().copied(),
    };

    let average_abstract_length = if abstract_lengths.is_empty() {
        0
    } else {
        abstract_lengths.iter().sum::<usize>() / abstract_lengths.len()
    };

    let top_keywords = top_n(keyword_counts.clone(), TOP_KEYWORDS)
        .map(|(term, count)| KeywordCount { term, count })
        .collect();
    let keyword_cloud_data = top_n(keyword_counts, KEYWORD_CLOUD_SIZE)
        .map(|(text, value)| CloudEntry { text, value })
        .collect();

    let recent_theses = recent_theses(documents, year_range.max, settings, recent_limit);

    ThesisStatistics {
        by_year,
        by_department,
        by_supervisor: Vec::new(),
        top_keywords,
        keyword_cloud_data,
        year_range,
        average_abstract_length,
        supervisors_count: 0,
        recent_theses,
    }
}

/// Documents whose year falls within the recency window of the newest
/// observed year (or of the configured fallback when none carries a year),
/// newest first.
fn recent_theses(
    documents: &[ThesisDocument],
    max_year: Option<i32>,
    settings: &StatisticsSettings,
    limit: usize,
) -> Vec<ThesisSummary> {
    let reference_year = max_year.unwrap_or(settings.fallback_max_year);
    let cutoff = reference_year - settings.recent_window_years;

    documents
        .iter()
        .filter(|doc| doc.year.is_some_and(|year| year >= cutoff))
        .sorted_by_key(|doc| std::cmp::Reverse(doc.year))
        .take(limit)
        .map(ThesisSummary::from_document)
        .collect()
}

fn count_values(values: impl Iterator<Item = String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
}

/// Counts ordered by count descending, name ascending for determinism.
fn top_n(counts: HashMap<String, usize>, n: usize) -> impl Iterator<Item = (String, usize)> {
    counts
        .into_iter()
        .sorted_by(|(name_a, count_a), (name_b, count_b)| {
            count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
        })
        .take(n)
}

/// Distinct supervisor names across a batch, sorted ascending.
pub fn unique_supervisors(documents: &[ThesisDocument]) -> Vec<String> {
    documents
        .iter()
        .flat_map(|doc| doc.supervisor.values())
        .collect::<HashSet<_>>()
        .into_iter()
        .sorted()
        .collect()
}

/// Distinct years across a batch, newest first.
pub fn unique_years(documents: &[ThesisDocument]) -> Vec<i32> {
    documents
        .iter()
        .filter_map(|doc| doc.year)
        .collect::<HashSet<_>>()
        .into_iter()
        .sorted_by_key(|year| std::cmp::Reverse(*year))
        .collect()
}
