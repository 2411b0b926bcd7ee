//! Request context carrying the authenticated identity and its session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use brainery_core::types::IdentityId;
use brainery_entity::identity::{Identity, Role};

/// Context for the current authenticated request.
///
/// Built by the session gate from the identity loaded for this request, so
/// `role` reflects promotions made after the session was opened.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated identity's ID.
    pub identity_id: IdentityId,
    /// The current session ID.
    pub session_id: Uuid,
    /// The identity's role as stored right now.
    pub role: Role,
    /// Display name.
    pub username: String,
    /// Email as entered at registration.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a freshly resolved identity.
    pub fn new(identity: &Identity, session_id: Uuid) -> Self {
        Self {
            identity_id: identity.id.clone(),
            session_id,
            role: identity.role,
            username: identity.username.clone(),
            email: identity.email.clone(),
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current identity is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
