use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Authentication module configuration.
///
/// Durations accept humantime strings in config files (`8h`, `30d`, `60s`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens.
    pub jwt_secret: String,

    /// Access token lifetime.
    #[serde(default = "default_access_ttl", with = "humantime_serde")]
    pub access_ttl: Duration,

    /// Refresh token lifetime.
    #[serde(default = "default_refresh_ttl", with = "humantime_serde")]
    pub refresh_ttl: Duration,

    /// Maximum inactivity before a session is considered dead, measured
    /// against the account's `last_activity` stamp.
    #[serde(default = "default_max_session_duration", with = "humantime_serde")]
    pub max_session_duration: Duration,

    /// Tokens younger than this pass validation even when `last_activity`
    /// is stale, so a fresh login is never bounced by old bookkeeping.
    #[serde(default = "default_freshness_window", with = "humantime_serde")]
    pub freshness_window: Duration,
}

fn default_access_ttl() -> Duration {
    Duration::from_secs(8 * 60 * 60)
}

fn default_refresh_ttl() -> Duration {
    Duration::from_secs(30 * 24 * 60 * 60)
}

fn default_max_session_duration() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_freshness_window() -> Duration {
    Duration::from_secs(60)
}

impl AuthConfig {
    /// Sensible defaults around a caller-provided secret.
    #[must_use]
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_ttl: default_access_ttl(),
            refresh_ttl: default_refresh_ttl(),
            max_session_duration: default_max_session_duration(),
            freshness_window: default_freshness_window(),
        }
    }
}
