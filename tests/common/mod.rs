// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::Router;
use baja360::config::Config;
use baja360::routes::create_router;
use baja360::services::{GarminClient, GarminService};
use baja360::session::Session;
use baja360::AppState;
use std::sync::Arc;

/// Serve a router on an ephemeral local port, returning its base URL.
///
/// Used to stand in for the Garmin endpoints in integration tests.
#[allow(dead_code)]
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Test config pointing all Garmin endpoints at a mock base URL.
#[allow(dead_code)]
pub fn test_config(mock_base: &str) -> Config {
    let mut config = Config::test_default();
    config.auth_url = format!("{}/oauth-login", mock_base);
    config.token_url = format!("{}/oauth-token", mock_base);
    config.api_base_url = mock_base.to_string();
    config
}

/// Create a test app with the given config.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let session = Session::load(config.token_file.as_deref());
    let garmin = GarminService::new(GarminClient::new(&config), session.clone());

    let state = Arc::new(AppState {
        config,
        session,
        garmin,
    });

    (create_router(state.clone()), state)
}
