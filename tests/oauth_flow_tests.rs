// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! End-to-end OAuth flow tests against a mock Garmin token endpoint.
//!
//! These tests verify that:
//! 1. The authorization redirect carries exactly one fresh state value
//! 2. The callback exchanges the code and persists the token
//! 3. Replayed callbacks never trigger a second exchange
//! 4. Exchange failures leave any prior token untouched

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    routing::post,
    Form, Json, Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

mod common;

/// Records token-endpoint traffic for assertions.
#[derive(Default)]
struct TokenMock {
    exchanges: AtomicUsize,
    last_form: Mutex<Option<HashMap<String, String>>>,
}

async fn token_ok(
    State(mock): State<Arc<TokenMock>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    mock.exchanges.fetch_add(1, Ordering::SeqCst);
    *mock.last_form.lock().unwrap() = Some(form);
    Json(serde_json::json!({ "access_token": "abc123" }))
}

async fn token_error(State(mock): State<Arc<TokenMock>>) -> StatusCode {
    mock.exchanges.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Spawn a mock token endpoint, returning its base URL and the recorder.
async fn spawn_token_mock(fail: bool) -> (String, Arc<TokenMock>) {
    let mock = Arc::new(TokenMock::default());
    let router = if fail {
        Router::new()
            .route("/oauth-token", post(token_error))
            .with_state(mock.clone())
    } else {
        Router::new()
            .route("/oauth-token", post(token_ok))
            .with_state(mock.clone())
    };
    (common::serve(router).await, mock)
}

/// Extract a query parameter from a URL without decoding.
fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|kv| {
        let (k, v) = kv.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

/// GET a path and return the response.
async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Run /auth/garmin and return the state embedded in the redirect.
async fn start_flow(app: &axum::Router) -> String {
    let response = get(app, "/auth/garmin").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .expect("redirect must carry a Location header")
        .to_string();

    query_param(&location, "state").expect("authorization URL must carry a state")
}

#[tokio::test]
async fn test_authorization_redirect_contains_oauth_params() {
    let (base, _mock) = spawn_token_mock(false).await;
    let (app, _state) = common::create_test_app(common::test_config(&base));

    let response = get(&app, "/auth/garmin").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!("{}/oauth-login?", base)));
    assert!(location.contains("client_id=test_client_id"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("redirect_uri="));
    assert!(location.contains("scope="));
    assert_eq!(location.matches("state=").count(), 1);
}

#[tokio::test]
async fn test_state_regenerated_per_redirect() {
    let (base, _mock) = spawn_token_mock(false).await;
    let (app, _state) = common::create_test_app(common::test_config(&base));

    let first = start_flow(&app).await;
    let second = start_flow(&app).await;
    assert_ne!(first, second, "state must never be reused across redirects");
}

#[tokio::test]
async fn test_full_oauth_flow_stores_token() {
    let (base, mock) = spawn_token_mock(false).await;

    let token_file = std::env::temp_dir().join(format!("baja360-oauth-test-{}", std::process::id()));
    let mut config = common::test_config(&base);
    config.token_file = Some(token_file.to_str().unwrap().to_string());

    let (app, state) = common::create_test_app(config);
    assert!(!state.session.is_authenticated().await);

    let oauth_state = start_flow(&app).await;
    let response = get(
        &app,
        &format!("/auth/garmin/callback?code=xyz&state={}", oauth_state),
    )
    .await;

    // Redirect to the frontend with the code stripped from the visible URL
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(location, "http://localhost:5173");

    assert!(state.session.is_authenticated().await);
    assert_eq!(
        state.session.access_token().await.as_deref(),
        Some("abc123")
    );

    // Durable storage holds the raw token string
    assert_eq!(
        std::fs::read_to_string(&token_file).unwrap().trim(),
        "abc123"
    );

    // Exactly one form-encoded exchange with the full parameter set
    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 1);
    let form = mock.last_form.lock().unwrap().clone().unwrap();
    assert_eq!(form.get("grant_type").map(String::as_str), Some("authorization_code"));
    assert_eq!(form.get("code").map(String::as_str), Some("xyz"));
    assert_eq!(form.get("client_id").map(String::as_str), Some("test_client_id"));
    assert_eq!(form.get("client_secret").map(String::as_str), Some("test_secret"));
    assert_eq!(
        form.get("redirect_uri").map(String::as_str),
        Some("http://localhost:8080/auth/garmin/callback")
    );

    let _ = std::fs::remove_file(&token_file);
}

#[tokio::test]
async fn test_replayed_callback_does_not_reexchange() {
    let (base, mock) = spawn_token_mock(false).await;
    let (app, state) = common::create_test_app(common::test_config(&base));

    let oauth_state = start_flow(&app).await;
    let uri = format!("/auth/garmin/callback?code=xyz&state={}", oauth_state);

    let first = get(&app, &uri).await;
    assert_eq!(first.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 1);

    // The pending state was consumed; the replay is rejected before any
    // second exchange can happen.
    let replay = get(&app, &uri).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 1);

    // The token from the first exchange is still in place
    assert!(state.session.is_authenticated().await);
}

#[tokio::test]
async fn test_callback_without_code_is_noop() {
    let (base, mock) = spawn_token_mock(false).await;
    let (app, state) = common::create_test_app(common::test_config(&base));

    let response = get(&app, "/auth/garmin/callback").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION].to_str().unwrap(),
        "http://localhost:5173"
    );

    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 0);
    assert!(!state.session.is_authenticated().await);
}

#[tokio::test]
async fn test_callback_with_forged_state_rejected() {
    let (base, mock) = spawn_token_mock(false).await;
    let (app, state) = common::create_test_app(common::test_config(&base));

    let _oauth_state = start_flow(&app).await;
    let response = get(&app, "/auth/garmin/callback?code=xyz&state=forged").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 0);
    assert!(!state.session.is_authenticated().await);
}

#[tokio::test]
async fn test_exchange_failure_leaves_prior_token_untouched() {
    let (base, mock) = spawn_token_mock(true).await;
    let (app, state) = common::create_test_app(common::test_config(&base));

    state.session.store_token("old-token").await;

    let oauth_state = start_flow(&app).await;
    let response = get(
        &app,
        &format!("/auth/garmin/callback?code=xyz&state={}", oauth_state),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(
        state.session.access_token().await.as_deref(),
        Some("old-token")
    );
}

#[tokio::test]
async fn test_vendor_error_redirects_with_error() {
    let (base, mock) = spawn_token_mock(false).await;
    let (app, state) = common::create_test_app(common::test_config(&base));

    let response = get(&app, "/auth/garmin/callback?error=access_denied").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION].to_str().unwrap(),
        "http://localhost:5173?error=access_denied"
    );

    assert_eq!(mock.exchanges.load(Ordering::SeqCst), 0);
    assert!(!state.session.is_authenticated().await);
}

#[tokio::test]
async fn test_status_and_logout_without_network() {
    // No mock server at all: status and logout must not touch the network
    let (app, state) = common::create_test_app(common::test_config("http://127.0.0.1:9"));

    let response = get(&app, "/auth/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["authenticated"], false);

    state.session.store_token("abc123").await;

    let response = get(&app, "/auth/status").await;
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["authenticated"], true);

    let response = get(&app, "/auth/logout").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(!state.session.is_authenticated().await);
}
