//! Document and indexing-batch shapes.

use serde::{Deserialize, Serialize};

/// A single searchable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub text: String,
}

/// A batch of documents bound for the indexer, routed by `index_name`.
///
/// `user_id` is stamped by the server from the authenticated subject before
/// the batch is serialized onto the queue; any client-supplied value is
/// overwritten. The downstream indexer tags documents with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingBatch {
    pub index_name: String,
    #[serde(default)]
    pub user_id: String,
    pub documents: Vec<Document>,
}
