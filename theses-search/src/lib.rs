//! Search & analytics core for a corpus of academic thesis records.
//!
//! The crate builds lexical, phrase and vector-similarity retrieval requests,
//! routes them to per-department collections, and aggregates corpus-wide
//! statistics from the returned documents. The retrieval engine and the
//! embedding model are consumed through trait boundaries; an HTTP layer on
//! top of this crate is a separate concern.

pub mod config;
pub mod domain;
