//! Department-to-collection routing.
//!
//! Each department owns a regular collection (lexical indexes) and a
//! semantic counterpart (precomputed abstract vectors). Documents in the two
//! share the same `hash_code`. One table drives both routing paths so they
//! cannot drift apart.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Top-level corpus partition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Cs,
    Informatics,
}

/// Which flavor of a department's collections a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Regular,
    Semantic,
}

impl Department {
    pub fn collection(self, kind: IndexKind) -> &'static str {
        match (self, kind) {
            (Department::Cs, IndexKind::Regular) => "cs_theses",
            (Department::Cs, IndexKind::Semantic) => "cs_theses_semantic",
            (Department::Informatics, IndexKind::Regular) => "infos_theses",
            (Department::Informatics, IndexKind::Semantic) => "infos_theses_semantic",
        }
    }
}

/// Resolve a department selector to the ordered list of collections to
/// query. An absent selector targets every department's collections in one
/// combined retrieval call.
pub fn resolve_collections(department: Option<Department>, kind: IndexKind) -> Vec<String> {
    match department {
        Some(dept) => vec![dept.collection(kind).to_owned()],
        None => Department::iter()
            .map(|dept| dept.collection(kind).to_owned())
            .collect(),
    }
}
