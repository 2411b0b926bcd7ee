//! In-process session registry.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use brainery_core::config::SessionConfig;
use brainery_core::types::IdentityId;
use brainery_entity::identity::Role;

use super::record::{Landing, Notice, SessionRecord};

/// Live sessions keyed by session id.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionRecord>,
    ttl: Duration,
    remember_ttl: Duration,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::minutes(config.ttl_minutes as i64),
            remember_ttl: Duration::days(config.remember_ttl_days as i64),
        }
    }

    /// Opens a session for an identity holding `role` right now.
    pub fn open(&self, identity_id: IdentityId, role: Role, remember: bool) -> SessionRecord {
        let now = Utc::now();
        let record = SessionRecord {
            id: Uuid::new_v4(),
            identity_id,
            landing: Landing::for_role(role),
            remember,
            created_at: now,
            expires_at: now + if remember { self.remember_ttl } else { self.ttl },
            csrf_token: Uuid::new_v4().simple().to_string(),
            notices: Vec::new(),
        };
        self.sessions.insert(record.id, record.clone());
        record
    }

    /// A live session. Expired sessions are dropped on sight.
    pub fn get(&self, id: &Uuid) -> Option<SessionRecord> {
        let record = self.sessions.get(id).map(|entry| entry.value().clone())?;
        if record.is_expired() {
            self.sessions.remove(id);
            return None;
        }
        Some(record)
    }

    /// Ends a session, discarding its pending notices.
    pub fn revoke(&self, id: &Uuid) -> Option<SessionRecord> {
        self.sessions.remove(id).map(|(_, record)| record)
    }

    /// Ends every session of an identity. Returns how many were ended.
    pub fn revoke_identity(&self, identity_id: &IdentityId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| &record.identity_id != identity_id);
        before.saturating_sub(self.sessions.len())
    }

    /// Queues a notice on a live session. Returns `false` if it is gone.
    pub fn push_notice(&self, id: &Uuid, notice: Notice) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.notices.push(notice);
                true
            }
            None => false,
        }
    }

    /// Drains the pending notices of a session.
    pub fn take_notices(&self, id: &Uuid) -> Vec<Notice> {
        self.sessions
            .get_mut(id)
            .map(|mut entry| std::mem::take(&mut entry.notices))
            .unwrap_or_default()
    }

    /// Removes every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, record| record.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of sessions held, expired or not.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NoticeLevel;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(&SessionConfig::default())
    }

    #[test]
    fn test_landing_follows_role_at_open() {
        let registry = registry();
        let user = registry.open(IdentityId::from(1), Role::User, false);
        let admin = registry.open(IdentityId::from(2), Role::Admin, false);
        assert_eq!(user.landing, Landing::Dashboard);
        assert_eq!(admin.landing.path(), "/admin");
    }

    #[test]
    fn test_remember_extends_lifetime() {
        let registry = registry();
        let short = registry.open(IdentityId::from(1), Role::User, false);
        let long = registry.open(IdentityId::from(1), Role::User, true);
        assert!(long.expires_at > short.expires_at + Duration::days(1));
    }

    #[test]
    fn test_revoke_drops_notices() {
        let registry = registry();
        let session = registry.open(IdentityId::from(1), Role::User, false);
        assert!(registry.push_notice(&session.id, Notice::new(NoticeLevel::Success, "Welcome")));
        assert!(registry.revoke(&session.id).is_some());
        assert!(registry.get(&session.id).is_none());
        assert!(registry.take_notices(&session.id).is_empty());
        assert!(!registry.push_notice(&session.id, Notice::new(NoticeLevel::Info, "late")));
    }

    #[test]
    fn test_take_notices_drains() {
        let registry = registry();
        let session = registry.open(IdentityId::from(1), Role::User, false);
        registry.push_notice(&session.id, Notice::new(NoticeLevel::Info, "one"));
        assert_eq!(registry.take_notices(&session.id).len(), 1);
        assert!(registry.take_notices(&session.id).is_empty());
    }

    #[test]
    fn test_purge_and_get_skip_expired() {
        let config = SessionConfig {
            ttl_minutes: 0,
            ..SessionConfig::default()
        };
        let registry = SessionRegistry::new(&config);
        let stale = registry.open(IdentityId::from(1), Role::User, false);
        registry.open(IdentityId::from(2), Role::User, false);
        assert!(registry.get(&stale.id).is_none());
        assert_eq!(registry.purge_expired(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_revoke_identity() {
        let registry = registry();
        registry.open(IdentityId::from(1), Role::User, false);
        registry.open(IdentityId::from(1), Role::User, true);
        registry.open(IdentityId::from(2), Role::User, false);
        assert_eq!(registry.revoke_identity(&IdentityId::from(1)), 2);
        assert_eq!(registry.len(), 1);
    }
}
