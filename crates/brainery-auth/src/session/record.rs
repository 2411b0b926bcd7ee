//! Session state held by the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use brainery_core::types::IdentityId;
use brainery_entity::identity::Role;

/// Where a session lands after login. Fixed when the session is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Landing {
    /// Admin console.
    Admin,
    /// Regular user dashboard.
    Dashboard,
}

impl Landing {
    /// Landing for a role at login time.
    pub fn for_role(role: Role) -> Self {
        if role.is_admin() {
            Self::Admin
        } else {
            Self::Dashboard
        }
    }

    /// Path the client should navigate to.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// Severity of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// A message queued for the next page the session renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Build a notice.
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// One authenticated session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Session id, carried in the token's `sid` claim.
    pub id: Uuid,
    /// Identity the session belongs to.
    pub identity_id: IdentityId,
    /// Post-login landing decided at login.
    pub landing: Landing,
    /// Whether the long-lived lifetime was requested.
    pub remember: bool,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Token that mutating requests must echo.
    pub csrf_token: String,
    /// Pending notices, drained by the client.
    pub notices: Vec<Notice>,
}

impl SessionRecord {
    /// Whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
