//! Index endpoints — protected entry points behind the auth middleware.
//!
//! The subject comes exclusively from the [`Subject`] extension installed by
//! the middleware; request bodies never influence whose identity is used.

use axum::Extension;
use axum::extract::State;

use searchgate_core::models::{Document, IndexingBatch};

use crate::AppState;
use crate::envelope::Envelope;
use crate::error::ApiResult;
use crate::extract::Payload;
use crate::middleware::auth::Subject;
use crate::models::{CreateIndexRequest, SearchDocumentsRequest};
use crate::services::access;

/// `POST /createIndex`
pub async fn create_index(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
    Payload(body): Payload<CreateIndexRequest>,
) -> ApiResult<Envelope<()>> {
    access::create_index(&state, &subject, &body.index_name).await?;
    Ok(Envelope::ok(()))
}

/// `POST /indexDocuments`
pub async fn index_documents(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
    Payload(batch): Payload<IndexingBatch>,
) -> ApiResult<Envelope<()>> {
    access::index_documents(&state, &subject, batch).await?;
    Ok(Envelope::ok(()))
}

/// `POST /searchDocuments`
pub async fn search_documents(
    State(state): State<AppState>,
    Extension(Subject(subject)): Extension<Subject>,
    Payload(body): Payload<SearchDocumentsRequest>,
) -> ApiResult<Envelope<Vec<Document>>> {
    let documents =
        access::search_documents(&state, &subject, &body.index_name, &body.query).await?;
    Ok(Envelope::ok(documents))
}
