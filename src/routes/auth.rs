// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/garmin", get(auth_start))
        .route("/auth/garmin/callback", get(auth_callback))
        .route("/auth/status", get(auth_status))
        .route("/auth/logout", get(logout))
}

/// Start OAuth flow - redirect to Garmin authorization.
///
/// A fresh anti-forgery state is generated on every call and remembered in
/// the session until the callback returns.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let auth_url = state.garmin.authorization_redirect().await?;

    tracing::info!(
        client_id = %state.config.garmin_client_id,
        "Starting OAuth flow, redirecting to Garmin"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token, store it in the session.
///
/// The redirect back to the frontend strips the code from the visible URL;
/// a repeated render without a code is a no-op, and a replayed callback with
/// the same code fails state verification before any second exchange.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    let frontend_url = &state.config.frontend_url;

    // Check for OAuth errors reported by the vendor
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Garmin");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok(Redirect::temporary(&redirect));
    }

    // No code means the flow already completed (or never started) - no-op
    let Some(code) = params.code else {
        return Ok(Redirect::temporary(frontend_url));
    };

    let returned_state = params.state.unwrap_or_default();

    tracing::info!("Exchanging authorization code for token");
    state
        .garmin
        .handle_oauth_callback(&code, &returned_state)
        .await?;

    Ok(Redirect::temporary(frontend_url))
}

/// Authentication state response.
#[derive(Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

/// Report whether the session holds a token. No Garmin call is made.
async fn auth_status(State(state): State<Arc<AppState>>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        authenticated: state.session.is_authenticated().await,
    })
}

/// Logout - clear the token from memory and durable storage.
async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    state.session.clear().await;
    tracing::info!("Session cleared");
    Redirect::temporary(&state.config.frontend_url)
}
