//! Kafka REST proxy producer.
//!
//! Publishes through the cluster's REST proxy rather than the native wire
//! protocol: one `POST /topics/{topic}` per batch with the payload as a
//! single JSON record.

use reqwest::Client;
use serde_json::{Value, json};
use tracing::error;

use super::{DocumentQueue, QueueError};

/// HTTP producer for a single topic.
pub struct RestQueueProducer {
    client: Client,
    topic_url: String,
}

impl RestQueueProducer {
    /// Build a producer against the first of `addrs` for `topic`.
    pub fn new(addrs: &[String], topic: &str) -> Result<Self, QueueError> {
        let base = addrs
            .first()
            .map(|a| a.trim_end_matches('/'))
            .ok_or_else(|| QueueError("no queue address configured".into()))?;
        Ok(Self {
            client: Client::new(),
            topic_url: format!("{base}/topics/{topic}"),
        })
    }
}

#[async_trait::async_trait]
impl DocumentQueue for RestQueueProducer {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), QueueError> {
        let value: Value = serde_json::from_slice(&payload)
            .map_err(|e| QueueError(format!("payload is not valid JSON: {e}")))?;

        let resp = self
            .client
            .post(&self.topic_url)
            .header("Content-Type", "application/vnd.kafka.json.v2+json")
            .json(&json!({ "records": [{ "value": value }] }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "queue publish request failed");
                QueueError(format!("publish request: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(%status, body, "queue publish rejected");
            return Err(QueueError(format!("publish: {status} {body}")));
        }
        Ok(())
    }
}
