// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// The variants deliberately keep "no token at all", "vendor rejected the
/// token", "vendor/transport failure" and "no domain data" apart so callers
/// can react differently to each.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not authenticated with Garmin")]
    NotAuthenticated,

    #[error("OAuth state mismatch")]
    InvalidOAuthState,

    #[error("Garmin rejected the access token")]
    TokenRejected,

    #[error("Garmin API error: {0}")]
    GarminApi(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated", None),
            AppError::InvalidOAuthState => (StatusCode::UNAUTHORIZED, "invalid_oauth_state", None),
            AppError::TokenRejected => (StatusCode::UNAUTHORIZED, "token_rejected", None),
            AppError::GarminApi(msg) => {
                (StatusCode::BAD_GATEWAY, "garmin_error", Some(msg.clone()))
            }
            AppError::NoData(msg) => (StatusCode::NOT_FOUND, "no_data", Some(msg.clone())),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
