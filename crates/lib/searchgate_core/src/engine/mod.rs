//! Search-engine capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Document;

pub mod elastic;

pub use elastic::ElasticEngine;

/// Search-engine failures. `AlreadyExists` is the only variant callers
/// pattern-match on; it is the global uniqueness gate for index names.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("index already exists")]
    AlreadyExists,

    #[error("search engine: {0}")]
    Backend(String),
}

/// The three engine operations the gateway needs. The engine owns a flat
/// index namespace shared by all tenants.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Create `index_name`, failing with [`EngineError::AlreadyExists`] if
    /// any tenant already holds that name.
    async fn create_index(&self, index_name: &str) -> Result<(), EngineError>;

    /// True iff `index_name` exists.
    async fn index_exists(&self, index_name: &str) -> Result<bool, EngineError>;

    /// Run a full-text query against `index_name`.
    async fn search(&self, index_name: &str, query: &str) -> Result<Vec<Document>, EngineError>;
}
