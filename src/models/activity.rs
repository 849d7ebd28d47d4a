// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin activity, device and derived-location models.
//!
//! These mirror the vendor's camelCase JSON. Activities are read-only remote
//! resources; `Location` is derived locally from the most recent activity and
//! is not a first-class Garmin resource.

use serde::{Deserialize, Serialize};

/// A single GPS sample within an activity, chronologically ordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Garmin activity with optional GPS track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Garmin activity ID
    pub activity_id: String,
    /// Activity name/title
    pub activity_name: String,
    /// Start time (ISO 8601)
    pub start_time: String,
    /// End time (ISO 8601)
    pub end_time: String,
    /// Distance in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// GPS samples in chronological order; empty for indoor activities
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
}

impl Activity {
    /// Last GPS sample of the track, i.e. the most recent known position.
    pub fn last_coordinate(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }
}

/// Wrapper object the activities list endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityList {
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Garmin device record. The vendor shape is loose; unknown fields are
/// ignored and everything beyond the ID is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device ID
    pub device_id: String,
    /// Model name (e.g. "inReach Mini 2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// User-visible device name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Last known location, derived from the newest activity's final GPS sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Activity end time as epoch milliseconds
    pub timestamp: i64,
}
