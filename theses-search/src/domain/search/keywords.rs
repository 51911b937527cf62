//! Keyword canonicalization.
//!
//! Raw keyword strings arrive in wildly inconsistent shapes ("ML",
//! "machine-learning", "Machine learning."). Normalization cleans the string
//! and maps known aliases to one canonical display label via a table loaded
//! from an external JSON resource, so the table can grow without code
//! changes.

use std::collections::HashMap;
use std::path::Path;

use super::fields::FieldValue;
use super::traits::{Result, SearchError};

const DEFAULT_SYNONYMS: &str = include_str!("../../../resources/keyword_synonyms.json");

/// Characters stripped from keywords before lookup. Hyphens survive because
/// aliases like "machine-learning" are meaningful.
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '"', '\''];

/// Maps raw keyword strings to canonical display labels.
pub struct KeywordNormalizer {
    table: HashMap<String, String>,
}

impl KeywordNormalizer {
    /// Load an alias table from a JSON file of `alias -> canonical label`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SearchError::Config(format!("reading synonym table: {e}")))?;
        Self::from_json(&raw)
    }

    fn from_json(raw: &str) -> Result<Self> {
        let table: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|e| SearchError::Config(format!("parsing synonym table: {e}")))?;
        Ok(Self { table })
    }

    /// Canonicalize one raw keyword string.
    ///
    /// Lowercases and trims, strips punctuation, collapses whitespace runs
    /// and repeated hyphens, then resolves the alias table; unmapped strings
    /// get title case. Idempotent: the table values are themselves fixed
    /// points of this function.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return String::new();
        }

        if let Some(canonical) = self.table.get(&cleaned) {
            return canonical.clone();
        }

        title_case(&cleaned)
    }

    /// Extract a polymorphic keyword field and normalize every value,
    /// dropping any that normalize to nothing.
    pub fn normalize_field(&self, field: &FieldValue) -> Vec<String> {
        field
            .values()
            .iter()
            .map(|raw| self.normalize(raw))
            .filter(|kw| !kw.is_empty())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn aliases(&self) -> impl Iterator<Item = (&String, &String)> {
        self.table.iter()
    }
}

impl Default for KeywordNormalizer {
    fn default() -> Self {
        // The embedded table is part of the crate; failing to parse it is a
        // build defect, not a runtime condition.
        Self::from_json(DEFAULT_SYNONYMS).expect("embedded synonym table is valid JSON")
    }
}

fn clean(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut stripped = String::with_capacity(lowered.len());
    let mut last_hyphen = false;
    for c in lowered.chars() {
        if STRIPPED_PUNCTUATION.contains(&c) {
            continue;
        }
        if c == '-' {
            if last_hyphen {
                continue;
            }
            last_hyphen = true;
        } else {
            last_hyphen = false;
        }
        stripped.push(c);
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn title_case(cleaned: &str) -> String {
    cleaned
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
