//! Domain models shared across the store, engine, and queue capabilities.
//!
//! Wire-level request/response shapes live in `searchgate_api`; these are the
//! records the capabilities themselves exchange.

pub mod documents;
pub mod user;

pub use documents::{Document, IndexingBatch};
pub use user::User;
