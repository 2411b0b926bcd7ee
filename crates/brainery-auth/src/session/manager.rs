//! Session lifecycle: open on login, authenticate per request, close on logout.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use brainery_core::config::{AuthConfig, SessionConfig};
use brainery_core::error::AppError;
use brainery_entity::identity::Identity;

use crate::jwt::{Claims, JwtDecoder, JwtEncoder};

use super::record::SessionRecord;
use super::registry::SessionRegistry;

/// A freshly opened session and the token naming it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Signed token for the client.
    pub token: String,
    /// Server-side state.
    pub session: SessionRecord,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    jwt_encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    jwt_decoder: Arc<JwtDecoder>,
    /// Live sessions.
    registry: Arc<SessionRegistry>,
}

impl SessionManager {
    /// Creates a session manager with an empty registry.
    pub fn new(auth_config: &AuthConfig, session_config: &SessionConfig) -> Self {
        Self {
            jwt_encoder: Arc::new(JwtEncoder::new(auth_config)),
            jwt_decoder: Arc::new(JwtDecoder::new(auth_config)),
            registry: Arc::new(SessionRegistry::new(session_config)),
        }
    }

    /// Opens a session for an identity whose credentials were just verified.
    pub fn open(&self, identity: &Identity, remember: bool) -> Result<IssuedSession, AppError> {
        let session = self
            .registry
            .open(identity.id.clone(), identity.role, remember);
        let token = match self
            .jwt_encoder
            .issue(&identity.id, session.id, session.expires_at)
        {
            Ok(token) => token,
            Err(e) => {
                self.registry.revoke(&session.id);
                return Err(e);
            }
        };

        info!(
            identity_id = %identity.id,
            session_id = %session.id,
            landing = session.landing.path(),
            remember,
            "Session opened"
        );
        Ok(IssuedSession { token, session })
    }

    /// Resolves a token to its live session. Any failure yields `None`.
    pub fn authenticate(&self, token: &str) -> Option<(Claims, SessionRecord)> {
        let claims = match self.jwt_decoder.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(reason = %e.message, "Session token rejected");
                return None;
            }
        };

        let session = self.registry.get(&claims.sid)?;
        if session.identity_id.as_str() != claims.sub {
            debug!(session_id = %claims.sid, "Session token subject mismatch");
            return None;
        }
        Some((claims, session))
    }

    /// Ends a session. Returns `false` if it was already gone.
    pub fn close(&self, session_id: &Uuid) -> bool {
        let closed = self.registry.revoke(session_id);
        if let Some(session) = &closed {
            info!(identity_id = %session.identity_id, session_id = %session_id, "Session closed");
        }
        closed.is_some()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::types::IdentityId;
    use brainery_entity::identity::Role;
    use chrono::Utc;

    fn identity(id: i64, role: Role) -> Identity {
        Identity {
            id: IdentityId::from(id),
            username: "Test User".into(),
            email: "t@example.com".into(),
            email_normalized: "t@example.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    fn manager() -> SessionManager {
        SessionManager::new(&AuthConfig::default(), &SessionConfig::default())
    }

    #[test]
    fn test_open_authenticate_close() {
        let manager = manager();
        let issued = manager.open(&identity(3, Role::User), false).unwrap();

        let (claims, session) = manager.authenticate(&issued.token).expect("live");
        assert_eq!(claims.sid, issued.session.id);
        assert_eq!(session.identity_id, IdentityId::from(3));

        assert!(manager.close(&issued.session.id));
        assert!(manager.authenticate(&issued.token).is_none());
        assert!(!manager.close(&issued.session.id));
    }

    #[test]
    fn test_garbage_tokens_fail_closed() {
        let manager = manager();
        assert!(manager.authenticate("").is_none());
        assert!(manager.authenticate("a.b.c").is_none());
    }

    #[test]
    fn test_token_from_another_manager_has_no_session() {
        let issued = manager().open(&identity(3, Role::Admin), false).unwrap();
        assert!(manager().authenticate(&issued.token).is_none());
    }
}
