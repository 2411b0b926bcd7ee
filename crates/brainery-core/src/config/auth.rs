//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and password policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Characters that satisfy the "special character" rule.
    #[serde(default = "default_special_chars")]
    pub password_special_chars: String,
    /// Optional zxcvbn score floor (0-4). Disabled when absent.
    #[serde(default)]
    pub password_min_score: Option<u8>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            password_min_length: default_password_min(),
            password_special_chars: default_special_chars(),
            password_min_score: None,
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_brainery".to_string()
}

fn default_password_min() -> usize {
    6
}

fn default_special_chars() -> String {
    "@$!%*?&#^-_.+=".to_string()
}
