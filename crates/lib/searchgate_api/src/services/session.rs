//! Login and refresh flows.
//!
//! Both flows end by rotating the user's refresh digest: the salted digest
//! of the newly minted refresh token atomically replaces the previous one,
//! and at any instant a single refresh token per user is current. A presented
//! refresh token whose digest does not match the stored one is rejected no
//! matter how valid its signature still is.

use chrono::Utc;
use tracing::error;

use searchgate_core::auth::hash;
use searchgate_core::auth::tokens::{self, VerifyError};
use searchgate_core::store::StoreError;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::TokenPairResponse;

/// Authenticate with login + password, returning a fresh token pair.
///
/// Every successful login rotates the refresh digest, implicitly
/// invalidating any refresh token issued earlier to the same user.
pub async fn login(state: &AppState, login: &str, password: &str) -> ApiResult<TokenPairResponse> {
    let user = match state.store.find_by_login(login).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(ApiError::Unauthorized("Unauthorized")),
        Err(e) => {
            error!(login, error = %e, "login: user lookup failed");
            return Err(ApiError::Internal);
        }
    };

    // Passwords are stored verbatim in this release.
    if user.password != password {
        return Err(ApiError::Unauthorized("Unauthorized"));
    }

    issue_pair(state, &user.id).await
}

/// Exchange a refresh token for a new pair, consuming it.
pub async fn refresh(state: &AppState, refresh_token: &str) -> ApiResult<TokenPairResponse> {
    let claims = tokens::verify(refresh_token, &state.config.jwt_key).map_err(|e| match e {
        VerifyError::Expired => ApiError::Unauthorized("Refresh token has expired"),
        _ => ApiError::Unauthorized("Unauthorized"),
    })?;

    let presented_digest = hash::digest(refresh_token, &state.config.token_salt);
    match state.store.is_blacklisted(&presented_digest).await {
        Ok(false) => {}
        Ok(true) => return Err(ApiError::Unauthorized("Token is blacklisted")),
        Err(e) => {
            error!(error = %e, "refresh: blacklist lookup failed");
            return Err(ApiError::Internal);
        }
    }

    // verify() guarantees a non-empty subject claim.
    let subject = claims.sub;

    let user = match state.store.find_by_id(&subject).await {
        Ok(user) => user,
        Err(e) => {
            error!(%subject, error = %e, "refresh: user lookup failed");
            return Err(ApiError::Internal);
        }
    };

    // Anti-replay: only the digest persisted at the last rotation is
    // accepted. The old digest is overwritten below, not blacklisted.
    if user.refresh_digest != presented_digest {
        return Err(ApiError::Unauthorized("Unauthorized"));
    }

    issue_pair(state, &subject).await
}

/// Mint an access+refresh pair for `subject` and persist the new refresh
/// digest.
async fn issue_pair(state: &AppState, subject: &str) -> ApiResult<TokenPairResponse> {
    let config = &state.config;
    let now = Utc::now();

    let access = tokens::mint(subject, now, config.access_ttl_secs, &config.jwt_key)
        .map_err(|e| {
            error!(subject, error = %e, "minting access token failed");
            ApiError::Internal
        })?;
    let refresh = tokens::mint(subject, now, config.refresh_ttl_secs, &config.jwt_key)
        .map_err(|e| {
            error!(subject, error = %e, "minting refresh token failed");
            ApiError::Internal
        })?;

    let refresh_digest = hash::digest(&refresh, &config.token_salt);
    if let Err(e) = state
        .store
        .set_refresh_digest(subject, &refresh_digest)
        .await
    {
        error!(subject, error = %e, "persisting refresh digest failed");
        return Err(ApiError::Internal);
    }

    Ok(TokenPairResponse {
        access_token: access,
        refresh_token: refresh,
    })
}
