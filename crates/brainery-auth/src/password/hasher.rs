//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use brainery_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Anything that is not a well-formed Argon2 PHC string, including hashes
    /// imported from older stores (`pbkdf2:sha256:...`, `scrypt:...`), never
    /// matches.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(scheme = %hash_scheme(hash), "Stored password hash is not a supported format");
                return false;
            }
        };

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                warn!(error = %e, "Password verification failed");
                false
            }
        }
    }

    /// Whether the hash is one this hasher produces.
    pub fn is_current_format(&self, hash: &str) -> bool {
        hash.starts_with("$argon2")
    }
}

/// Scheme prefix of a stored hash, safe to log.
fn hash_scheme(hash: &str) -> &str {
    let end = hash
        .find(|c: char| c == ':' || c == '$')
        .filter(|&i| i > 0)
        .unwrap_or(0);
    if end == 0 { "unknown" } else { &hash[..end] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("Abc123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("Abc123!", &hash));
        assert!(!hasher.verify_password("Abc123?", &hash));
        assert!(hasher.is_current_format(&hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("Abc123!").unwrap();
        let b = hasher.hash_password("Abc123!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_legacy_and_malformed_hashes_never_match() {
        let hasher = PasswordHasher::new();
        for stored in [
            "pbkdf2:sha256:600000$salt$0123456789abcdef",
            "scrypt:32768:8:1$salt$abcdef",
            "",
            "$argon2id$garbage",
        ] {
            assert!(!hasher.verify_password("Abc123!", stored));
        }
        assert_eq!(hash_scheme("pbkdf2:sha256:1$x$y"), "pbkdf2");
        assert_eq!(hash_scheme("plain"), "unknown");
    }
}
