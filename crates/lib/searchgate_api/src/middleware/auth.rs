//! Authentication middleware — bearer extraction and token verification.
//!
//! The gate runs in a fixed order and the first failure answers the request:
//! header, signature+expiry, blacklist, subject. The blacklist lookup is the
//! only I/O and runs after the cryptographic checks. Access-token digests go
//! through it as well; an out-of-band logout flow may populate the list.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::error;

use searchgate_core::auth::tokens::{self, VerifyError};
use searchgate_core::auth::hash;

use crate::AppState;
use crate::error::ApiError;

/// Authenticated subject, attached to request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct Subject(pub String);

/// Axum middleware guarding every protected route.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(state.config.token_header.as_str())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if token.is_empty() {
        return Err(ApiError::Unauthorized("Unauthorized"));
    }

    let claims = tokens::verify(token, &state.config.jwt_key).map_err(|e| match e {
        VerifyError::Expired => {
            ApiError::Unauthorized("Token has expired, refresh it or login again")
        }
        _ => ApiError::Unauthorized("Unauthorized"),
    })?;

    let digest = hash::digest(token, &state.config.token_salt);
    let blacklisted = state.store.is_blacklisted(&digest).await.map_err(|e| {
        error!(error = %e, "blacklist lookup failed while gating request");
        ApiError::Internal
    })?;
    if blacklisted {
        return Err(ApiError::Unauthorized("Token is blacklisted"));
    }

    // Terminal guard; verify() already rejects empty subjects.
    if claims.sub.is_empty() {
        return Err(ApiError::Unauthorized("Unauthorized"));
    }

    request.extensions_mut().insert(Subject(claims.sub));
    Ok(next.run(request).await)
}
