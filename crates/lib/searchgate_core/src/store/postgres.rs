//! PostgreSQL identity store.
//!
//! Schema (owned by the operators, users are provisioned out-of-band):
//!
//! ```sql
//! CREATE TABLE users (
//!     id             TEXT PRIMARY KEY,
//!     login          TEXT NOT NULL UNIQUE,
//!     password       TEXT NOT NULL,
//!     index_limit    INT  NOT NULL DEFAULT 0,
//!     indexes        TEXT[] NOT NULL DEFAULT '{}',
//!     refresh_digest TEXT NOT NULL DEFAULT ''
//! );
//! CREATE TABLE token_blacklist (digest TEXT PRIMARY KEY);
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use super::{IdentityStore, StoreError};
use crate::models::User;

/// sqlx-backed [`IdentityStore`] over a shared connection pool.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type UserRow = (String, String, String, i32, Vec<String>, String);

fn into_user(row: UserRow) -> User {
    let (id, login, password, index_limit, indexes, refresh_digest) = row;
    User {
        id,
        login,
        password,
        index_limit,
        indexes,
        refresh_digest,
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password, index_limit, indexes, refresh_digest \
             FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(login, error = %e, "user lookup by login failed");
            backend(e)
        })?;
        row.map(into_user).ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password, index_limit, indexes, refresh_digest \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(user_id = id, error = %e, "user lookup by id failed");
            backend(e)
        })?;
        row.map(into_user).ok_or(StoreError::NotFound)
    }

    async fn set_refresh_digest(&self, id: &str, digest: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET refresh_digest = $2 WHERE id = $1")
            .bind(id)
            .bind(digest)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(user_id = id, error = %e, "setting refresh digest failed");
                backend(e)
            })?;
        if result.rows_affected() == 0 {
            error!(user_id = id, "setting refresh digest failed: no such user");
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn owns_index(&self, id: &str, index_name: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND $2 = ANY(indexes))",
        )
        .bind(id)
        .bind(index_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(user_id = id, index_name, error = %e, "ownership check failed");
            backend(e)
        })
    }

    async fn append_index(&self, id: &str, index_name: &str) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE users SET indexes = array_append(indexes, $2) WHERE id = $1")
                .bind(id)
                .bind(index_name)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!(user_id = id, index_name, error = %e, "appending index failed");
                    backend(e)
                })?;
        if result.rows_affected() == 0 {
            error!(user_id = id, index_name, "appending index failed: no such user");
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn is_blacklisted(&self, digest: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE digest = $1)",
        )
        .bind(digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "blacklist lookup failed");
            backend(e)
        })
    }

    async fn blacklist(&self, digest: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO token_blacklist (digest) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(digest)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "blacklist insert failed");
                backend(e)
            })?;
        Ok(())
    }
}
