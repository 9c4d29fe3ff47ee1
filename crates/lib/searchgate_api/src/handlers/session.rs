//! Session endpoints — the two unauthenticated entry points.

use axum::extract::State;

use crate::AppState;
use crate::envelope::Envelope;
use crate::error::ApiResult;
use crate::extract::Payload;
use crate::models::{LoginRequest, RefreshRequest, TokenPairResponse};
use crate::services::session;

/// `POST /login` — authenticate with login + password.
pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload<LoginRequest>,
) -> ApiResult<Envelope<TokenPairResponse>> {
    let pair = session::login(&state, &body.login, &body.password).await?;
    Ok(Envelope::ok(pair))
}

/// `POST /refresh` — exchange a refresh token for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    Payload(body): Payload<RefreshRequest>,
) -> ApiResult<Envelope<TokenPairResponse>> {
    let pair = session::refresh(&state, &body.refresh_token).await?;
    Ok(Envelope::ok(pair))
}
