// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes backing the dashboard.
//!
//! Everything except `/api/frames` proxies the Garmin wellness API through
//! the session; the service layer fails fast with 401 when no token is
//! stored.

use crate::error::Result;
use crate::models::frame::DASHBOARD_FRAMES;
use crate::models::{Activity, Device, Frame, Location, UserInfo};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/activities", get(get_activities))
        .route("/api/activities/{id}", get(get_activity))
        .route("/api/devices", get(get_devices))
        .route("/api/location", get(get_location))
        .route("/api/frames", get(get_frames))
}

/// Get current user profile.
async fn get_me(State(state): State<Arc<AppState>>) -> Result<Json<UserInfo>> {
    Ok(Json(state.garmin.get_user_info().await?))
}

/// Query parameters for the activities list.
#[derive(Deserialize)]
pub struct ActivitiesParams {
    #[serde(default)]
    limit: Option<u32>,
}

/// List recent activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesParams>,
) -> Result<Json<Vec<Activity>>> {
    let limit = params.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    Ok(Json(state.garmin.get_recent_activities(limit).await?))
}

/// Get a single activity with its GPS track.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    Ok(Json(state.garmin.get_activity_details(&id).await?))
}

/// List the user's registered devices.
async fn get_devices(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Device>>> {
    Ok(Json(state.garmin.get_device_info().await?))
}

/// Last known location, derived from the newest activity.
async fn get_location(State(state): State<Arc<AppState>>) -> Result<Json<Location>> {
    Ok(Json(state.garmin.get_user_location().await?))
}

/// The compiled-in dashboard frame list, in display order.
async fn get_frames() -> Json<&'static [Frame]> {
    Json(DASHBOARD_FRAMES)
}
