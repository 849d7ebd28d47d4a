// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Baja360: race dashboard backend for live rider tracking
//!
//! This crate provides the backend API behind the Baja360 dashboard: the
//! Garmin OAuth session, bearer-authenticated Garmin wellness API access,
//! last-known-location derivation, and the compiled-in frame configuration
//! the dashboard grid renders.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use services::GarminService;
use session::Session;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    pub garmin: GarminService,
}
