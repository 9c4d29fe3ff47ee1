//! Identity-store user record.

use serde::{Deserialize, Serialize};

/// A tenant as persisted by the identity store.
///
/// `refresh_digest` holds the salted digest of the single currently-valid
/// refresh token; it is empty until the user first logs in. `indexes` is the
/// ordered list of index names the user has created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub password: String,
    pub index_limit: i32,
    pub indexes: Vec<String>,
    pub refresh_digest: String,
}
