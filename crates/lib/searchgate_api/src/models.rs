//! Wire-level request and response shapes.
//!
//! Indexing batches reuse [`searchgate_core::models::IndexingBatch`] directly:
//! the inbound body and the queue payload are the same shape, with the
//! server overwriting `user_id` in between.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by `/login` and `/refresh`.
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateIndexRequest {
    pub index_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchDocumentsRequest {
    pub index_name: String,
    pub query: String,
}
