//! Session token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use brainery_core::config::AuthConfig;
use brainery_core::error::AppError;

use super::claims::Claims;

/// Validates session tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Checks signature and expiry and returns the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthenticated("Session token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::unauthenticated("Invalid session token signature")
                }
                _ => AppError::unauthenticated("Invalid session token"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use brainery_core::error::ErrorKind;
    use brainery_core::types::IdentityId;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_issue_then_decode() {
        let cfg = config("a-test-secret-of-some-length");
        let sid = Uuid::new_v4();
        let token = JwtEncoder::new(&cfg)
            .issue(&IdentityId::from(7), sid, Utc::now() + Duration::hours(1))
            .unwrap();

        let claims = JwtDecoder::new(&cfg).decode(&token).unwrap();
        assert_eq!(claims.identity_id(), IdentityId::from(7));
        assert_eq!(claims.session_id(), sid);
    }

    #[test]
    fn test_rejects_foreign_signature_and_expiry() {
        let issued = JwtEncoder::new(&config("one-secret-for-signing"))
            .issue(&IdentityId::from(1), Uuid::new_v4(), Utc::now() + Duration::hours(1))
            .unwrap();
        let err = JwtDecoder::new(&config("another-secret-entirely"))
            .decode(&issued)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);

        let cfg = config("a-test-secret-of-some-length");
        let stale = JwtEncoder::new(&cfg)
            .issue(&IdentityId::from(1), Uuid::new_v4(), Utc::now() - Duration::hours(1))
            .unwrap();
        assert!(JwtDecoder::new(&cfg).decode(&stale).is_err());
        assert!(JwtDecoder::new(&cfg).decode("not.a.token").is_err());
    }
}
