//! Document-queue capability.
//!
//! The gateway only produces: each accepted indexing batch is serialized to
//! JSON and handed to the bus, and a downstream indexer consumes it.

use async_trait::async_trait;
use thiserror::Error;

pub mod rest;

pub use rest::RestQueueProducer;

/// Queue failures, opaque to callers.
#[derive(Debug, Error)]
#[error("document queue: {0}")]
pub struct QueueError(pub String);

/// Producer side of the durable message bus. The topic is fixed at
/// construction; payloads are opaque bytes.
#[async_trait]
pub trait DocumentQueue: Send + Sync {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), QueueError>;
}
