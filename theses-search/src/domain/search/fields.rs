//! Polymorphic document fields.
//!
//! Upstream ingestion stores `supervisor` and `keywords` as either a single
//! string, a delimited string, or a list of strings. The tagged union below
//! normalizes all of those shapes to a flat sequence at the read boundary so
//! nothing downstream branches on shape again.

use serde::{Deserialize, Serialize};

/// A field that may be absent, a scalar string, or a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Missing,
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// Flatten to an ordered sequence of trimmed, non-empty values.
    ///
    /// A scalar containing a comma is split on commas; otherwise, one
    /// containing a semicolon is split on semicolons; otherwise it is a
    /// single value. List elements are trimmed and empties dropped.
    pub fn values(&self) -> Vec<String> {
        match self {
            FieldValue::Missing => Vec::new(),
            FieldValue::One(raw) => split_scalar(raw),
            FieldValue::Many(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// The field joined into one display string, list shapes comma-separated.
    pub fn joined(&self) -> String {
        self.values().join(", ")
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

fn split_scalar(raw: &str) -> Vec<String> {
    let delimiter = if raw.contains(',') {
        Some(',')
    } else if raw.contains(';') {
        Some(';')
    } else {
        None
    };

    match delimiter {
        Some(d) => raw
            .split(d)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect(),
        None => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_owned()]
            }
        }
    }
}
