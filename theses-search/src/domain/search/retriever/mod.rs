//! Retrieval service implementations.

mod elastic;
#[cfg(test)]
mod mock;

pub use elastic::ElasticRetriever;
#[cfg(test)]
pub use mock::MockRetriever;
