//! Application configuration loaded from environment variables.
//!
//! The Garmin endpoint URLs default to the production endpoints but can be
//! overridden, which is how the integration tests point the client at a
//! local mock server.

use std::env;

/// OAuth scopes requested from the user.
pub const GARMIN_SCOPES: &[&str] = &[
    "ACTIVITY:READ",
    "ACTIVITY:CREATE",
    "ACTIVITY:UPDATE",
    "ACTIVITY:DELETE",
    "DEVICE_INFO:READ",
    "USER_INFO:READ",
    "WELLNESS:READ",
];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Credentials ---
    /// Garmin OAuth client ID (public)
    pub garmin_client_id: String,
    /// Garmin OAuth client secret
    pub garmin_client_secret: String,

    // --- Endpoints ---
    /// Garmin authorization endpoint (user-facing redirect target)
    pub auth_url: String,
    /// Garmin token endpoint (code exchange)
    pub token_url: String,
    /// Garmin REST API base URL
    pub api_base_url: String,
    /// Our redirect URI, registered with Garmin
    pub redirect_uri: String,

    // --- Server ---
    /// Frontend URL to send the browser back to after OAuth completes
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Path of the file holding the persisted access token, if any
    pub token_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            garmin_client_id: env::var("GARMIN_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GARMIN_CLIENT_ID"))?,
            garmin_client_secret: env::var("GARMIN_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GARMIN_CLIENT_SECRET"))?,
            auth_url: env::var("GARMIN_AUTH_URL")
                .unwrap_or_else(|_| "https://auth.garmin.com/oauth-login".to_string()),
            token_url: env::var("GARMIN_TOKEN_URL")
                .unwrap_or_else(|_| "https://auth.garmin.com/oauth-token".to_string()),
            api_base_url: env::var("GARMIN_API_BASE_URL")
                .unwrap_or_else(|_| "https://apis.garmin.com".to_string()),
            redirect_uri: env::var("REDIRECT_URI").unwrap_or_else(|_| {
                format!("http://localhost:{}/auth/garmin/callback", port)
            }),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
            token_file: env::var("TOKEN_FILE").ok(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            garmin_client_id: "test_client_id".to_string(),
            garmin_client_secret: "test_secret".to_string(),
            auth_url: "https://auth.garmin.example/oauth-login".to_string(),
            token_url: "https://auth.garmin.example/oauth-token".to_string(),
            api_base_url: "https://apis.garmin.example".to_string(),
            redirect_uri: "http://localhost:8080/auth/garmin/callback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            token_file: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
