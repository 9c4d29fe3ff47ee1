//! Per-index authorization and the guarded engine/queue interactions.

use tracing::error;

use searchgate_core::engine::EngineError;
use searchgate_core::models::{Document, IndexingBatch};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

/// One message for both "no such index" and "not yours"; responses must not
/// reveal to a non-owner whether an index exists.
const NO_ACCESS: &str = "Index doesn't exist or you don't have access to it";

/// Create `index_name` in the engine and record `subject` as its owner.
///
/// The engine's create-if-absent is the global uniqueness gate for index
/// names across tenants.
pub async fn create_index(state: &AppState, subject: &str, index_name: &str) -> ApiResult<()> {
    match state.engine.create_index(index_name).await {
        Ok(()) => {}
        Err(EngineError::AlreadyExists) => {
            return Err(ApiError::Conflict("Index with such name already exists"));
        }
        Err(e) => {
            error!(index_name, error = %e, "index create failed");
            return Err(ApiError::Internal);
        }
    }

    if let Err(e) = state.store.append_index(subject, index_name).await {
        // No compensating delete: the engine index stays behind, unowned.
        error!(subject, index_name, error = %e, "recording index ownership failed, engine index is orphaned");
        return Err(ApiError::Internal);
    }

    Ok(())
}

/// Ownership and existence must both hold before any observable side effect.
async fn ensure_access(state: &AppState, subject: &str, index_name: &str) -> ApiResult<()> {
    let owns = state
        .store
        .owns_index(subject, index_name)
        .await
        .map_err(|e| {
            error!(subject, index_name, error = %e, "ownership check failed");
            ApiError::Internal
        })?;

    let exists = state.engine.index_exists(index_name).await.map_err(|e| {
        error!(index_name, error = %e, "index existence check failed");
        ApiError::Internal
    })?;

    if !exists || !owns {
        return Err(ApiError::Forbidden(NO_ACCESS));
    }
    Ok(())
}

/// Enqueue `batch` for asynchronous indexing.
///
/// `batch.user_id` is overwritten with the authenticated subject before
/// serialization; whatever the client sent there is discarded.
pub async fn index_documents(
    state: &AppState,
    subject: &str,
    mut batch: IndexingBatch,
) -> ApiResult<()> {
    ensure_access(state, subject, &batch.index_name).await?;

    batch.user_id = subject.to_string();
    let payload = serde_json::to_vec(&batch).map_err(|e| {
        error!(error = %e, "serializing indexing batch failed");
        ApiError::Internal
    })?;

    if let Err(e) = state.queue.publish(payload).await {
        error!(index_name = %batch.index_name, error = %e, "enqueueing indexing batch failed");
        return Err(ApiError::Internal);
    }

    Ok(())
}

/// Run `query` against `index_name` on behalf of `subject`.
pub async fn search_documents(
    state: &AppState,
    subject: &str,
    index_name: &str,
    query: &str,
) -> ApiResult<Vec<Document>> {
    ensure_access(state, subject, index_name).await?;

    state.engine.search(index_name, query).await.map_err(|e| {
        error!(index_name, error = %e, "search failed");
        ApiError::Internal
    })
}
