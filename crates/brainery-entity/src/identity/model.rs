//! Identity entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brainery_core::types::IdentityId;

use super::role::Role;

/// Canonical comparison key for an email address: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A registered user's authentication record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque, stable identifier.
    pub id: IdentityId,
    /// Display name, built from first and last name at registration.
    pub username: String,
    /// Email as entered (trimmed), kept for display.
    pub email: String,
    /// Unique comparison key; see [`normalize_email`].
    pub email_normalized: String,
    /// Argon2id PHC string, or a legacy hash imported from an older store.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Authorization role.
    pub role: Role,
    /// When the identity was registered.
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Check if this identity has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Display name.
    pub username: String,
    /// Email as entered. Stores derive the normalized key themselves.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Initial role.
    pub role: Role,
}

impl NewIdentity {
    /// Normalized form of [`Self::email`].
    pub fn email_normalized(&self) -> String {
        normalize_email(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@Test.com "), "a@test.com");
        assert_eq!(normalize_email("a@test.com"), "a@test.com");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let identity = Identity {
            id: IdentityId::from(1),
            username: "Ada Lovelace".into(),
            email: "Ada@Example.com".into(),
            email_normalized: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&identity).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }
}
