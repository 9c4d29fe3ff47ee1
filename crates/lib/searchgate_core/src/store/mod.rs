//! Identity-store capability.
//!
//! The trait is the narrow contract the pipeline needs from the user
//! datastore; `NotFound` is a distinguished result the session flows
//! pattern-match on, everything else is an opaque backend failure.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::User;

pub mod postgres;

pub use postgres::PgIdentityStore;

/// Identity-store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No user matched the lookup.
    #[error("user not found")]
    NotFound,

    /// Any other backend failure, opaque to callers.
    #[error("identity store: {0}")]
    Backend(String),
}

/// Persistence capability for users, their index ownership, the current
/// refresh-token digest, and the token blacklist.
///
/// Implementations must be safe for concurrent use; `set_refresh_digest` is a
/// single-writer atomic replace, and `owns_index` runs server-side as one
/// query so the core never read-modify-writes ownership.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Exact-match lookup by login.
    async fn find_by_login(&self, login: &str) -> Result<User, StoreError>;

    /// Exact-match lookup by user id.
    async fn find_by_id(&self, id: &str) -> Result<User, StoreError>;

    /// Atomically replace the user's current refresh digest.
    async fn set_refresh_digest(&self, id: &str, digest: &str) -> Result<(), StoreError>;

    /// True iff `index_name` is in the user's ownership list.
    async fn owns_index(&self, id: &str, index_name: &str) -> Result<bool, StoreError>;

    /// Append `index_name` to the user's ownership list.
    async fn append_index(&self, id: &str, index_name: &str) -> Result<(), StoreError>;

    /// True iff `digest` has been blacklisted.
    async fn is_blacklisted(&self, digest: &str) -> Result<bool, StoreError>;

    /// Idempotently insert `digest` into the blacklist.
    async fn blacklist(&self, digest: &str) -> Result<(), StoreError>;
}
