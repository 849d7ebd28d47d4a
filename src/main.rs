// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Baja360 API Server
//!
//! Backend for the Baja360 race dashboard: Garmin OAuth session handling,
//! bearer-authenticated wellness API access, and the compiled-in frame
//! configuration the dashboard grid renders.

use baja360::{
    config::Config,
    services::{GarminClient, GarminService},
    session::Session,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Baja360 API");

    // Load the session, picking up a persisted token if one exists
    let session = Session::load(config.token_file.as_deref());
    if session.is_authenticated().await {
        tracing::info!("Resuming authenticated session from token file");
    }

    // Initialize Garmin service
    let garmin = GarminService::new(GarminClient::new(&config), session.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        session,
        garmin,
    });

    // Build router
    let app = baja360::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("baja360=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
