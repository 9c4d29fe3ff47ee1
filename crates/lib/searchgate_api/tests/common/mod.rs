//! Shared harness for router-level tests: in-memory collaborators behind the
//! real router, driven with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use searchgate_api::config::Config;
use searchgate_api::{AppState, router};
use searchgate_core::auth::tokens;
use searchgate_core::models::User;
use searchgate_core::testutil::{MemoryIdentityStore, RecordingQueue, StubEngine};

pub const KEY: &[u8] = b"integration-test-key";
pub const SALT: &str = "integration-test-salt";

/// Deliberately not `Authorization`: the header name is configuration.
pub const TOKEN_HEADER: &str = "X-Auth-Token";

pub fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".into(),
        engine_urls: vec!["http://localhost:9200".into()],
        engine_api_key: String::new(),
        queue_addrs: vec!["http://localhost:8082".into()],
        queue_topic: "documents".into(),
        db_addr: "localhost:5432".into(),
        db_name: "searchgate".into(),
        db_user: "searchgate".into(),
        db_password: String::new(),
        log_level: "info".into(),
        access_ttl_secs: 60,
        refresh_ttl_secs: 3600,
        token_salt: SALT.into(),
        jwt_key: KEY.to_vec(),
        token_header: TOKEN_HEADER.into(),
    }
}

/// Router plus handles onto the fakes behind it.
pub struct TestApp {
    pub store: Arc<MemoryIdentityStore>,
    pub engine: Arc<StubEngine>,
    pub queue: Arc<RecordingQueue>,
    pub router: Router,
}

pub fn build_app(
    store: MemoryIdentityStore,
    engine: StubEngine,
    queue: RecordingQueue,
) -> TestApp {
    let store = Arc::new(store);
    let engine = Arc::new(engine);
    let queue = Arc::new(queue);
    let state = AppState {
        store: store.clone(),
        engine: engine.clone(),
        queue: queue.clone(),
        config: Arc::new(test_config()),
    };
    TestApp {
        store,
        engine,
        queue,
        router: router(state),
    }
}

pub fn user(id: &str, login: &str, password: &str) -> User {
    User {
        id: id.into(),
        login: login.into(),
        password: password.into(),
        index_limit: 10,
        indexes: Vec::new(),
        refresh_digest: String::new(),
    }
}

/// A token minted a few seconds in the past, so a pair minted "now" by the
/// server can never collide with it byte-for-byte.
pub fn backdated_token(subject: &str, ttl_secs: i64) -> String {
    tokens::mint(subject, Utc::now() - Duration::seconds(5), ttl_secs, KEY).unwrap()
}

pub fn access_token(subject: &str) -> String {
    backdated_token(subject, 60)
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(router, req).await
}

pub async fn post(
    router: &Router,
    path: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    post_raw(router, path, body.to_string(), token).await
}

pub async fn post_raw(
    router: &Router,
    path: &str,
    body: String,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    let req = builder.body(Body::from(body)).unwrap();
    send(router, req).await
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse JSON body");
    (status, json)
}

/// The exact failure envelope every error response must match.
pub fn error_envelope(message: &str) -> Value {
    serde_json::json!({
        "success": false,
        "errorMessage": message,
        "data": null,
    })
}
