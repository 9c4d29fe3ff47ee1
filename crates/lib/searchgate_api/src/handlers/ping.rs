//! Liveness probe.

use serde_json::{Value, json};

use crate::envelope::Envelope;

/// `GET /ping`
pub async fn ping() -> Envelope<Value> {
    Envelope::ok(json!({ "pong": "pong" }))
}
