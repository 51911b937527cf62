//! Embedding generation implementations.

mod http;
mod lazy;

pub use http::HttpEmbedder;
pub use lazy::LazyEmbedder;
#[cfg(test)]
pub use mock::MockEmbedder;
