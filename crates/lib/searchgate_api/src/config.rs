//! Server configuration.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Configuration errors that abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_KEY is not set")]
    MissingJwtKey,

    #[error("JWT_KEY is not valid base64: {0}")]
    BadJwtKey(#[from] base64::DecodeError),

    #[error("{0} is not a valid integer: {1}")]
    BadInteger(&'static str, std::num::ParseIntError),
}

/// Runtime configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// Search-engine node URLs.
    pub engine_urls: Vec<String>,
    /// Search-engine API key.
    pub engine_api_key: String,
    /// Queue REST proxy addresses.
    pub queue_addrs: Vec<String>,
    /// Topic the indexing batches are produced to.
    pub queue_topic: String,
    /// Identity-store host:port.
    pub db_addr: String,
    /// Identity-store database name.
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    /// Default log filter, overridable via `RUST_LOG`.
    pub log_level: String,
    /// Access-token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh-token lifetime in seconds.
    pub refresh_ttl_secs: i64,
    /// Process-wide digest salt, distinct from the signing key.
    pub token_salt: String,
    /// Raw HMAC signing key bytes.
    pub jwt_key: Vec<u8>,
    /// Header the bearer token is read from.
    pub token_header: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a semicolon-separated list, dropping empty entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn int_or(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::BadInteger(key, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                | Default                  |
    /// |-------------------------|--------------------------|
    /// | `LISTEN_ADDR`           | `0.0.0.0:8080`           |
    /// | `ELASTIC_SEARCH_URL`    | `http://localhost:9200` (`;`-separated) |
    /// | `ELASTIC_SEARCH_KEY`    | empty                    |
    /// | `KAFKA_ADDR`            | `http://localhost:8082` (`;`-separated) |
    /// | `KAFKA_TOPIC`           | `documents`              |
    /// | `DB_ADDR` / `DB` / `DB_USER` / `DB_PASSWORD` | `localhost:5432` / `searchgate` / `searchgate` / empty |
    /// | `LOG_LEVEL`             | `info`                   |
    /// | `JWT_ACCESS_TOKEN_TTL`  | `300` (seconds)          |
    /// | `JWT_REFRESH_TOKEN_TTL` | `86400` (seconds)        |
    /// | `JWT_TOKEN_SALT`        | empty                    |
    /// | `JWT_KEY`               | required, base64         |
    /// | `TOKEN_HEADER_NAME`     | `Authorization`          |
    ///
    /// A missing or undecodable `JWT_KEY` is a fatal error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_key_b64 = std::env::var("JWT_KEY").map_err(|_| ConfigError::MissingJwtKey)?;
        let jwt_key = STANDARD.decode(jwt_key_b64.trim())?;

        Ok(Self {
            listen_addr: env_or("LISTEN_ADDR", "0.0.0.0:8080"),
            engine_urls: split_list(&env_or("ELASTIC_SEARCH_URL", "http://localhost:9200")),
            engine_api_key: env_or("ELASTIC_SEARCH_KEY", ""),
            queue_addrs: split_list(&env_or("KAFKA_ADDR", "http://localhost:8082")),
            queue_topic: env_or("KAFKA_TOPIC", "documents"),
            db_addr: env_or("DB_ADDR", "localhost:5432"),
            db_name: env_or("DB", "searchgate"),
            db_user: env_or("DB_USER", "searchgate"),
            db_password: env_or("DB_PASSWORD", ""),
            log_level: env_or("LOG_LEVEL", "info"),
            access_ttl_secs: int_or("JWT_ACCESS_TOKEN_TTL", 300)?,
            refresh_ttl_secs: int_or("JWT_REFRESH_TOKEN_TTL", 86400)?,
            token_salt: env_or("JWT_TOKEN_SALT", ""),
            jwt_key,
            token_header: env_or("TOKEN_HEADER_NAME", "Authorization"),
        })
    }

    /// Identity-store connection URL.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}",
            self.db_user, self.db_password, self.db_addr, self.db_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_empty_entries() {
        assert_eq!(
            split_list("http://a:9200;http://b:9200;"),
            vec!["http://a:9200".to_string(), "http://b:9200".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
