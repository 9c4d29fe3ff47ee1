//! Elasticsearch client.
//!
//! Talks plain HTTP to the first configured node. Only three endpoints are
//! used: `PUT /{index}`, `HEAD /{index}`, and `POST /{index}/_search` with a
//! `query_string` query.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::{EngineError, SearchEngine};
use crate::models::Document;

/// The ES error type returned when an index name is taken.
const ERR_RESOURCE_ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// HTTP Elasticsearch client.
pub struct ElasticEngine {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    query: QueryClause<'a>,
}

#[derive(Serialize)]
struct QueryClause<'a> {
    query_string: QueryString<'a>,
}

#[derive(Serialize)]
struct QueryString<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: serde_json::Value,
}

#[derive(Deserialize)]
struct EsErrorBody {
    error: EsErrorCause,
}

#[derive(Deserialize)]
struct EsErrorCause {
    #[serde(rename = "type")]
    kind: String,
}

impl ElasticEngine {
    /// Build a client against the first of `urls`, authenticating every
    /// request with `api_key`.
    pub fn new(urls: &[String], api_key: &str) -> Result<Self, EngineError> {
        let base_url = urls
            .first()
            .map(|u| u.trim_end_matches('/').to_string())
            .ok_or_else(|| EngineError::Backend("no search engine URL configured".into()))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: api_key.to_string(),
        })
    }

    fn index_url(&self, index_name: &str) -> String {
        format!("{}/{index_name}", self.base_url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Authorization", format!("ApiKey {}", self.api_key))
    }
}

#[async_trait::async_trait]
impl SearchEngine for ElasticEngine {
    async fn create_index(&self, index_name: &str) -> Result<(), EngineError> {
        let resp = self
            .authed(self.client.put(self.index_url(index_name)))
            .send()
            .await
            .map_err(|e| {
                error!(index_name, error = %e, "index create request failed");
                EngineError::Backend(format!("index create request: {e}"))
            })?;

        if resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST
            && serde_json::from_str::<EsErrorBody>(&body)
                .is_ok_and(|b| b.error.kind == ERR_RESOURCE_ALREADY_EXISTS)
        {
            return Err(EngineError::AlreadyExists);
        }

        error!(index_name, %status, body, "index create rejected");
        Err(EngineError::Backend(format!(
            "index create: {status} {body}"
        )))
    }

    async fn index_exists(&self, index_name: &str) -> Result<bool, EngineError> {
        let resp = self
            .authed(self.client.head(self.index_url(index_name)))
            .send()
            .await
            .map_err(|e| {
                error!(index_name, error = %e, "index exists request failed");
                EngineError::Backend(format!("index exists request: {e}"))
            })?;

        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(EngineError::Backend(format!("index exists: {s}"))),
        }
    }

    async fn search(&self, index_name: &str, query: &str) -> Result<Vec<Document>, EngineError> {
        let resp = self
            .authed(
                self.client
                    .post(format!("{}/_search", self.index_url(index_name))),
            )
            .json(&SearchBody {
                query: QueryClause {
                    query_string: QueryString { query },
                },
            })
            .send()
            .await
            .map_err(|e| {
                error!(index_name, error = %e, "search request failed");
                EngineError::Backend(format!("search request: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(index_name, %status, body, "search rejected");
            return Err(EngineError::Backend(format!("search: {status} {body}")));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Backend(format!("search response parse: {e}")))?;

        let mut documents = Vec::with_capacity(parsed.hits.hits.len());
        for hit in parsed.hits.hits {
            match serde_json::from_value::<Document>(hit.source) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    warn!(index_name, error = %e, "skipping hit with undecodable source");
                }
            }
        }
        Ok(documents)
    }
}
