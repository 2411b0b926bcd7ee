//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session lifetime and transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of a session created without "remember me", in minutes.
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u64,
    /// Lifetime of a remembered session, in days.
    #[serde(default = "default_remember_ttl")]
    pub remember_ttl_days: u64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl(),
            remember_ttl_days: default_remember_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_ttl() -> u64 {
    120
}

fn default_remember_ttl() -> u64 {
    30
}

fn default_cookie_name() -> String {
    "brainery_session".to_string()
}

fn default_cleanup_interval() -> u64 {
    15
}
