// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin API client for the OAuth code exchange and wellness endpoints.
//!
//! Handles:
//! - Authorization URL construction
//! - Authorization-code exchange at the token endpoint
//! - Bearer-authenticated resource fetches (profile, activities, devices)
//! - Last-known-location derivation from the newest activity

use crate::config::{Config, GARMIN_SCOPES};
use crate::error::AppError;
use crate::models::activity::ActivityList;
use crate::models::{Activity, Device, Location, UserInfo};
use crate::session::Session;
use crate::time_utils::parse_epoch_millis;
use serde::Deserialize;

/// Low-level Garmin API client.
#[derive(Clone)]
pub struct GarminClient {
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GarminClient {
    /// Create a new Garmin client from configured endpoints and credentials.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            api_base_url: config.api_base_url.clone(),
            client_id: config.garmin_client_id.clone(),
            client_secret: config.garmin_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Build the vendor authorization URL for the given anti-forgery state.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&GARMIN_SCOPES.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::GarminApi(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Garmin token exchange failed");
            return Err(AppError::GarminApi(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::GarminApi(format!("Failed to parse token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Get the authenticated user's profile.
    pub async fn get_user_info(&self, access_token: &str) -> Result<UserInfo, AppError> {
        let url = format!("{}/userprofile/v2/userinfo", self.api_base_url);
        self.get_json(&url, access_token).await
    }

    /// List recent activities, newest first.
    pub async fn list_activities(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!(
            "{}/wellness-api/rest/activities?start=0&limit={}",
            self.api_base_url, limit
        );
        let list: ActivityList = self.get_json(&url, access_token).await?;
        Ok(list.activities)
    }

    /// Get a single activity with its GPS track.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: &str,
    ) -> Result<Activity, AppError> {
        let url = format!("{}/activity/{}", self.api_base_url, activity_id);
        self.get_json(&url, access_token).await
    }

    /// List the user's registered devices.
    pub async fn list_devices(&self, access_token: &str) -> Result<Vec<Device>, AppError> {
        let url = format!("{}/wellness-api/rest/devices", self.api_base_url);
        self.get_json(&url, access_token).await
    }

    /// Generic bearer-authenticated GET with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::GarminApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Unauthorized - token revoked or expired on the vendor side
            if status.as_u16() == 401 {
                tracing::warn!("Garmin rejected the access token (401)");
                return Err(AppError::TokenRejected);
            }

            return Err(AppError::GarminApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GarminApi(format!("JSON parse error: {}", e)))
    }
}

/// Token exchange response from Garmin OAuth.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// GarminService - High-level service bound to the session
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Garmin service tying the API client to the session.
///
/// Every accessor resolves the token from the session first and fails fast
/// with `AppError::NotAuthenticated` when it is absent. There is no retry,
/// no backoff and no proactive expiry check: a vendor 401 surfaces as
/// `AppError::TokenRejected` and nothing else invalidates a stored token.
#[derive(Clone)]
pub struct GarminService {
    client: GarminClient,
    session: Session,
}

impl GarminService {
    pub fn new(client: GarminClient, session: Session) -> Self {
        Self { client, session }
    }

    /// Generate a fresh state token and return the authorization URL to
    /// redirect the user agent to.
    pub async fn authorization_redirect(&self) -> Result<String, AppError> {
        let state = self.session.begin_authorization().await?;
        Ok(self.client.authorization_url(&state))
    }

    /// Handle the OAuth callback: verify the state, exchange the code, and
    /// store the resulting token in the session.
    ///
    /// A state mismatch (or a replayed callback, since the pending state is
    /// single-use) is rejected before any exchange happens. On exchange
    /// failure no token is stored and a previously stored token is left
    /// untouched.
    pub async fn handle_oauth_callback(&self, code: &str, state: &str) -> Result<(), AppError> {
        if !self.session.consume_state(state).await {
            tracing::warn!("OAuth callback with unknown or reused state, rejecting");
            return Err(AppError::InvalidOAuthState);
        }

        let access_token = self.client.exchange_code(code).await?;
        self.session.store_token(&access_token).await;

        tracing::info!("OAuth code exchanged, session authenticated");
        Ok(())
    }

    /// Resolve the session token or fail with `NotAuthenticated`.
    async fn require_token(&self) -> Result<String, AppError> {
        self.session
            .access_token()
            .await
            .ok_or(AppError::NotAuthenticated)
    }

    /// Get the authenticated user's profile.
    pub async fn get_user_info(&self) -> Result<UserInfo, AppError> {
        let token = self.require_token().await?;
        self.client.get_user_info(&token).await
    }

    /// List recent activities, newest first.
    pub async fn get_recent_activities(&self, limit: u32) -> Result<Vec<Activity>, AppError> {
        let token = self.require_token().await?;
        self.client.list_activities(&token, limit).await
    }

    /// Get a single activity with its GPS track.
    pub async fn get_activity_details(&self, activity_id: &str) -> Result<Activity, AppError> {
        let token = self.require_token().await?;
        self.client.get_activity(&token, activity_id).await
    }

    /// List the user's registered devices.
    pub async fn get_device_info(&self) -> Result<Vec<Device>, AppError> {
        let token = self.require_token().await?;
        self.client.list_devices(&token).await
    }

    /// Derive the last known location from the most recent activity.
    ///
    /// Fetches a single activity and returns its chronologically-last GPS
    /// sample stamped with the activity end time. No activities and a track
    /// without samples are both "no data", reported distinctly in the logs.
    pub async fn get_user_location(&self) -> Result<Location, AppError> {
        let activities = self.get_recent_activities(1).await?;

        let Some(activity) = activities.first() else {
            tracing::warn!("No recent activities found");
            return Err(AppError::NoData("no recent activities".to_string()));
        };

        let Some(last) = activity.last_coordinate() else {
            tracing::warn!(
                activity_id = %activity.activity_id,
                "No GPS coordinates in latest activity"
            );
            return Err(AppError::NoData(
                "latest activity has no GPS coordinates".to_string(),
            ));
        };

        let timestamp = parse_epoch_millis(&activity.end_time).ok_or_else(|| {
            AppError::GarminApi(format!(
                "Unparseable activity end time: {}",
                activity.end_time
            ))
        })?;

        Ok(Location {
            latitude: last.latitude,
            longitude: last.longitude,
            timestamp,
        })
    }
}
