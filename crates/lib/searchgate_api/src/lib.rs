//! # searchgate_api
//!
//! HTTP surface for Searchgate: router, auth middleware, handlers, and the
//! uniform response envelope.

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use searchgate_core::engine::SearchEngine;
use searchgate_core::queue::DocumentQueue;
use searchgate_core::store::IdentityStore;

use crate::config::Config;
use crate::handlers::{indices, ping, session};

/// Shared application state passed to all handlers.
///
/// The collaborator handles are created at startup and shared across request
/// tasks; the config (signing key, salt, TTLs, header name) is read-only
/// after initialization.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IdentityStore>,
    pub engine: Arc<dyn SearchEngine>,
    pub queue: Arc<dyn DocumentQueue>,
    pub config: Arc<Config>,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/ping", get(ping::ping))
        .route("/login", post(session::login))
        .route("/refresh", post(session::refresh));

    // Protected routes (require a valid bearer token)
    let protected = Router::new()
        .route("/createIndex", post(indices::create_index))
        .route("/indexDocuments", post(indices::index_documents))
        .route("/searchDocuments", post(indices::search_documents))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
