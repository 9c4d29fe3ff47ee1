//! Login and refresh flows end-to-end: rotation, replay rejection, and the
//! exact error envelopes.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use searchgate_core::auth::{hash, tokens};
use searchgate_core::models::User;
use searchgate_core::testutil::{MemoryIdentityStore, RecordingQueue, StubEngine};

fn app_with_user(user: User) -> TestApp {
    build_app(
        MemoryIdentityStore::new().with_user(user),
        StubEngine::new(),
        RecordingQueue::new(),
    )
}

#[tokio::test]
async fn login_returns_pair_and_rotates_digest() {
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post(
        &app.router,
        "/login",
        json!({"login": "alice", "password": "pw"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["errorMessage"], "");

    let access = body["data"]["access_token"].as_str().expect("access_token");
    let refresh = body["data"]["refresh_token"]
        .as_str()
        .expect("refresh_token");
    assert!(tokens::verify(access, KEY).is_ok());
    assert!(tokens::verify(refresh, KEY).is_ok());

    // The store holds the salted digest of the exact refresh token string.
    assert_eq!(
        app.store.refresh_digest_of("alice-id").unwrap(),
        hash::digest(refresh, SALT)
    );
}

#[tokio::test]
async fn login_unknown_user_is_unauthorized() {
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post(
        &app.router,
        "/login",
        json!({"login": "nobody", "password": "pw"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Unauthorized"));
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post(
        &app.router,
        "/login",
        json!({"login": "alice", "password": "not_pw"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Unauthorized"));
}

#[tokio::test]
async fn login_store_failure_is_internal() {
    let app = app_with_user(user("alice-id", "alice", "pw"));
    app.store.fail_on("find_by_login");

    let (status, body) = post(
        &app.router,
        "/login",
        json!({"login": "alice", "password": "pw"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, error_envelope("Internal server error"));
}

#[tokio::test]
async fn login_digest_persist_failure_is_internal() {
    let app = app_with_user(user("alice-id", "alice", "pw"));
    app.store.fail_on("set_refresh_digest");

    let (status, body) = post(
        &app.router,
        "/login",
        json!({"login": "alice", "password": "pw"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, error_envelope("Internal server error"));
}

#[tokio::test]
async fn login_rejects_undecodable_payload() {
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post_raw(&app.router, "/login", "{not json".into(), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, error_envelope("Invalid request payload"));
}

#[tokio::test]
async fn refresh_rotates_and_rejects_replay() {
    let current = backdated_token("alice-id", 3600);
    let mut alice = user("alice-id", "alice", "pw");
    alice.refresh_digest = hash::digest(&current, SALT);
    let app = app_with_user(alice);

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": current}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let new_refresh = body["data"]["refresh_token"]
        .as_str()
        .expect("refresh_token");
    assert_ne!(new_refresh, current);
    assert_eq!(
        app.store.refresh_digest_of("alice-id").unwrap(),
        hash::digest(new_refresh, SALT)
    );

    // The consumed token is still cryptographically valid, yet the mismatch
    // against the rotated digest makes any replay terminal.
    assert!(tokens::verify(&current, KEY).is_ok());
    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": current}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Unauthorized"));
}

#[tokio::test]
async fn login_invalidates_outstanding_refresh_token() {
    let outstanding = backdated_token("alice-id", 3600);
    let mut alice = user("alice-id", "alice", "pw");
    alice.refresh_digest = hash::digest(&outstanding, SALT);
    let app = app_with_user(alice);

    let (status, _) = post(
        &app.router,
        "/login",
        json!({"login": "alice", "password": "pw"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": outstanding}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Unauthorized"));
}

#[tokio::test]
async fn refresh_expired_token_has_distinct_message() {
    let expired = tokens::mint(
        "alice-id",
        chrono::Utc::now() - chrono::Duration::seconds(7200),
        3600,
        KEY,
    )
    .unwrap();
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": expired}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Refresh token has expired"));
}

#[tokio::test]
async fn refresh_garbage_token_is_unauthorized() {
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": "not-a-jwt"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Unauthorized"));
}

#[tokio::test]
async fn refresh_blacklisted_token_is_rejected() {
    let current = backdated_token("alice-id", 3600);
    let mut alice = user("alice-id", "alice", "pw");
    alice.refresh_digest = hash::digest(&current, SALT);
    let app = app_with_user(alice);
    app.store.seed_blacklist(&hash::digest(&current, SALT));

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": current}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Token is blacklisted"));
}

#[tokio::test]
async fn refresh_blacklist_store_error_is_internal() {
    let current = backdated_token("alice-id", 3600);
    let app = app_with_user(user("alice-id", "alice", "pw"));
    app.store.fail_on("is_blacklisted");

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": current}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, error_envelope("Internal server error"));
}

#[tokio::test]
async fn refresh_for_unknown_subject_is_internal() {
    // A signed token for a user the store has never seen: lookup failure is
    // an internal error, not an auth outcome.
    let stray = backdated_token("ghost-id", 3600);
    let app = app_with_user(user("alice-id", "alice", "pw"));

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": stray}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, error_envelope("Internal server error"));
}

#[tokio::test]
async fn refresh_digest_mismatch_is_unauthorized() {
    let presented = backdated_token("alice-id", 3600);
    let mut alice = user("alice-id", "alice", "pw");
    alice.refresh_digest = hash::digest("a different token", SALT);
    let app = app_with_user(alice);

    let (status, body) = post(
        &app.router,
        "/refresh",
        json!({"refresh_token": presented}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error_envelope("Unauthorized"));
}
