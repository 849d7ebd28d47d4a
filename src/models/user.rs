//! User profile model.

use serde::{Deserialize, Serialize};

/// Garmin user profile, fetched on demand and never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Garmin user ID
    pub user_id: String,
    /// Display name
    pub display_name: String,
    /// Email address
    pub email: String,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}
