//! Store contracts shared by both backends.
//!
//! Every owner-scoped operation takes the owner id explicitly and filters on
//! it in the same statement (or critical section) as the read or write. A
//! record that exists but belongs to someone else is reported exactly like a
//! missing one.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use brainery_core::result::AppResult;
use brainery_core::types::{
    IdentityId, Page, PageRequest, ResourceId, SavedTopicId, SubjectId,
};
use brainery_entity::catalog::{CatalogTopic, NewCatalogTopic, NewSubject, Subject};
use brainery_entity::identity::{Identity, NewIdentity, Role};
use brainery_entity::record::{NewResource, NewSavedTopic, Resource, ResourcePatch, SavedTopic};

/// Persistence of identity records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find an identity by email. The argument is normalized before lookup.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>>;

    /// Find an identity by id. Ids this backend could not have issued match nothing.
    async fn find_by_id(&self, id: &IdentityId) -> AppResult<Option<Identity>>;

    /// Create an identity. Fails with `DuplicateIdentity` when the normalized
    /// email is taken; the check and the insert are a single atomic step.
    async fn create(&self, draft: &NewIdentity) -> AppResult<Identity>;

    /// Replace the password hash. Returns `false` when the identity is absent.
    async fn update_password(&self, id: &IdentityId, password_hash: &str) -> AppResult<bool>;

    /// Change the role. Returns `false` when the identity is absent.
    async fn update_role(&self, id: &IdentityId, role: Role) -> AppResult<bool>;

    /// Delete an identity together with every record it owns.
    async fn delete(&self, id: &IdentityId) -> AppResult<bool>;

    /// List identities, newest first.
    async fn list(&self, page: &PageRequest) -> AppResult<Page<Identity>>;

    /// Count all identities.
    async fn count(&self) -> AppResult<u64>;

    /// Count identities holding the given role.
    async fn count_by_role(&self, role: Role) -> AppResult<u64>;
}

/// Persistence of saved topics, scoped by owner.
#[async_trait]
pub trait SavedTopicStore: Send + Sync + 'static {
    /// Insert a saved topic. Fails with `DuplicateTitle` when the owner already
    /// has one with the same normalized title.
    async fn create(&self, owner: &IdentityId, draft: &NewSavedTopic) -> AppResult<SavedTopic>;

    /// All of the owner's saved topics, newest first.
    async fn list_for_owner(&self, owner: &IdentityId) -> AppResult<Vec<SavedTopic>>;

    /// One saved topic, if it exists and belongs to the owner.
    async fn get(&self, owner: &IdentityId, id: &SavedTopicId) -> AppResult<Option<SavedTopic>>;

    /// Change the title. `None` when absent or not owned; `DuplicateTitle`
    /// when the new title collides with another of the owner's topics.
    async fn rename(
        &self,
        owner: &IdentityId,
        id: &SavedTopicId,
        title: &str,
    ) -> AppResult<Option<SavedTopic>>;

    /// Delete a saved topic. `false` when absent or not owned.
    async fn delete(&self, owner: &IdentityId, id: &SavedTopicId) -> AppResult<bool>;
}

/// Persistence of resources, scoped by owner.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    /// Insert a resource for the owner.
    async fn create(&self, owner: &IdentityId, draft: &NewResource) -> AppResult<Resource>;

    /// All of the owner's resources, newest first.
    async fn list_for_owner(&self, owner: &IdentityId) -> AppResult<Vec<Resource>>;

    /// One resource, if it exists and belongs to the owner.
    async fn get(&self, owner: &IdentityId, id: &ResourceId) -> AppResult<Option<Resource>>;

    /// Apply whitelisted changes. `None` when absent or not owned.
    async fn update(
        &self,
        owner: &IdentityId,
        id: &ResourceId,
        patch: &ResourcePatch,
    ) -> AppResult<Option<Resource>>;

    /// Delete a resource. `false` when absent or not owned.
    async fn delete(&self, owner: &IdentityId, id: &ResourceId) -> AppResult<bool>;
}

/// Read access to the shared catalog, plus the upserts used for seeding.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// All subjects, by name ascending.
    async fn list_subjects(&self) -> AppResult<Vec<Subject>>;

    /// One subject by id.
    async fn find_subject(&self, id: &SubjectId) -> AppResult<Option<Subject>>;

    /// Topics of a subject, by title ascending.
    async fn list_topics(&self, subject: &SubjectId) -> AppResult<Vec<CatalogTopic>>;

    /// First catalog topic whose title matches case-insensitively.
    async fn find_topic_by_title(&self, title: &str) -> AppResult<Option<CatalogTopic>>;

    /// Insert a subject, or update the icon of the existing one with that name.
    async fn upsert_subject(&self, subject: &NewSubject) -> AppResult<Subject>;

    /// Insert a topic under a subject, or update the description of the
    /// existing topic with that title.
    async fn upsert_topic(
        &self,
        subject: &SubjectId,
        topic: &NewCatalogTopic,
    ) -> AppResult<CatalogTopic>;
}

/// Connectivity and lifecycle of a backend.
#[async_trait]
pub trait StoreHealth: Send + Sync + 'static {
    /// Round-trip to the backend.
    async fn ping(&self) -> AppResult<()>;

    /// Flush and release backend resources.
    async fn close(&self);
}

/// Fixed-width UTC timestamp text. Both backends store this form so that
/// lexical order equals chronological order.
pub(crate) fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Trim an optional text field, turning blank input into `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_text_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = whole + chrono::Duration::microseconds(1);
        assert_eq!(timestamp_text(whole), "2024-05-01T12:00:00.000000Z");
        assert!(timestamp_text(whole) < timestamp_text(later));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  video ")), Some("video".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
