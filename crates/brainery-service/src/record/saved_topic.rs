//! Saved topics: bookmark, list, fetch, rename, remove.

use std::sync::Arc;

use tracing::{debug, info};

use brainery_core::error::AppError;
use brainery_core::types::SavedTopicId;
use brainery_database::{CatalogStore, SavedTopicStore};
use brainery_entity::record::{NO_SUMMARY_PLACEHOLDER, NewSavedTopic, SavedTopic};

use crate::context::RequestContext;

/// Saved topic use cases for the calling identity.
#[derive(Clone)]
pub struct SavedTopicService {
    saved_topics: Arc<dyn SavedTopicStore>,
    catalog: Arc<dyn CatalogStore>,
}

fn required_title(title: &str, message: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_field("title", message));
    }
    Ok(title.to_string())
}

impl SavedTopicService {
    /// Creates a new saved topic service.
    pub fn new(saved_topics: Arc<dyn SavedTopicStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            saved_topics,
            catalog,
        }
    }

    /// Bookmarks a topic. Without a summary, the catalog description of a
    /// topic with the same title is used, then the placeholder.
    pub async fn save(
        &self,
        ctx: &RequestContext,
        title: &str,
        summary: Option<&str>,
    ) -> Result<SavedTopic, AppError> {
        let title = required_title(title, "Invalid data - Title missing")?;
        let summary = match summary.map(str::trim).filter(|s| !s.is_empty()) {
            Some(summary) => summary.to_string(),
            None => self.backfill_summary(&title).await?,
        };

        let saved = self
            .saved_topics
            .create(&ctx.identity_id, &NewSavedTopic { title, summary })
            .await?;
        info!(identity_id = %ctx.identity_id, topic_id = %saved.id, "Topic saved");
        Ok(saved)
    }

    async fn backfill_summary(&self, title: &str) -> Result<String, AppError> {
        let description = self
            .catalog
            .find_topic_by_title(title)
            .await?
            .and_then(|topic| topic.description)
            .filter(|d| !d.trim().is_empty());
        if description.is_none() {
            debug!(title, "No catalog summary for topic");
        }
        Ok(description.unwrap_or_else(|| NO_SUMMARY_PLACEHOLDER.to_string()))
    }

    /// The caller's saved topics, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<SavedTopic>, AppError> {
        self.saved_topics.list_for_owner(&ctx.identity_id).await
    }

    /// One of the caller's saved topics.
    pub async fn get(&self, ctx: &RequestContext, id: &SavedTopicId) -> Result<SavedTopic, AppError> {
        self.saved_topics
            .get(&ctx.identity_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Topic not found"))
    }

    /// Renames one of the caller's saved topics.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        id: &SavedTopicId,
        title: &str,
    ) -> Result<SavedTopic, AppError> {
        let title = required_title(title, "New title required")?;
        self.saved_topics
            .rename(&ctx.identity_id, id, &title)
            .await?
            .ok_or_else(|| AppError::not_found("Topic not found"))
    }

    /// Removes one of the caller's saved topics.
    pub async fn delete(&self, ctx: &RequestContext, id: &SavedTopicId) -> Result<(), AppError> {
        if !self.saved_topics.delete(&ctx.identity_id, id).await? {
            return Err(AppError::not_found("Topic not found"));
        }
        info!(identity_id = %ctx.identity_id, topic_id = %id, "Saved topic removed");
        Ok(())
    }
}

impl std::fmt::Debug for SavedTopicService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedTopicService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::config::StoreBackend;
    use brainery_core::error::ErrorKind;
    use brainery_database::StoreSet;
    use brainery_entity::catalog::{NewCatalogTopic, NewSubject};
    use brainery_entity::identity::{Identity, NewIdentity, Role};
    use rstest::rstest;
    use uuid::Uuid;

    async fn owner(stores: &StoreSet, email: &str) -> RequestContext {
        let identity: Identity = stores
            .identities
            .create(&NewIdentity {
                username: "Owner".into(),
                email: email.into(),
                password_hash: "x".into(),
                role: Role::User,
            })
            .await
            .unwrap();
        RequestContext::new(&identity, Uuid::new_v4())
    }

    async fn setup(backend: StoreBackend) -> (StoreSet, SavedTopicService) {
        let stores = StoreSet::in_memory(backend).await.unwrap();
        let service = SavedTopicService::new(
            Arc::clone(&stores.saved_topics),
            Arc::clone(&stores.catalog),
        );
        (stores, service)
    }

    #[rstest]
    #[case::relational(StoreBackend::Relational)]
    #[case::document(StoreBackend::Document)]
    #[tokio::test]
    async fn test_save_twice_conflicts(#[case] backend: StoreBackend) {
        let (stores, service) = setup(backend).await;
        let ctx = owner(&stores, "a@test.com").await;

        service.save(&ctx, "Calculus", Some("Limits")).await.unwrap();
        let err = service.save(&ctx, " calculus ", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateTitle);
        assert_eq!(service.list(&ctx).await.unwrap().len(), 1);
    }

    #[rstest]
    #[case::relational(StoreBackend::Relational)]
    #[case::document(StoreBackend::Document)]
    #[tokio::test]
    async fn test_summary_backfill(#[case] backend: StoreBackend) {
        let (stores, service) = setup(backend).await;
        let ctx = owner(&stores, "a@test.com").await;
        let maths = stores
            .catalog
            .upsert_subject(&NewSubject {
                name: "Mathematics".into(),
                icon: None,
            })
            .await
            .unwrap();
        stores
            .catalog
            .upsert_topic(
                &maths.id,
                &NewCatalogTopic {
                    title: "Algebra".into(),
                    description: Some("Symbols and rules".into()),
                },
            )
            .await
            .unwrap();

        let from_catalog = service.save(&ctx, "algebra", Some("  ")).await.unwrap();
        assert_eq!(from_catalog.summary, "Symbols and rules");

        let placeholder = service.save(&ctx, "Topology", None).await.unwrap();
        assert_eq!(placeholder.summary, NO_SUMMARY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let (stores, service) = setup(StoreBackend::Document).await;
        let ctx = owner(&stores, "a@test.com").await;
        let err = service.save(&ctx, "   ", None).await.unwrap_err();
        assert_eq!(err.field.as_deref(), Some("title"));
    }

    #[rstest]
    #[case::relational(StoreBackend::Relational)]
    #[case::document(StoreBackend::Document)]
    #[tokio::test]
    async fn test_non_owner_sees_not_found(#[case] backend: StoreBackend) {
        let (stores, service) = setup(backend).await;
        let alice = owner(&stores, "a@test.com").await;
        let bob = owner(&stores, "b@test.com").await;
        let saved = service.save(&alice, "Calculus", None).await.unwrap();

        for err in [
            service.get(&bob, &saved.id).await.unwrap_err(),
            service.rename(&bob, &saved.id, "Mine").await.unwrap_err(),
            service.delete(&bob, &saved.id).await.unwrap_err(),
        ] {
            assert_eq!(err.kind, ErrorKind::NotFound);
            assert_eq!(err.message, "Topic not found");
        }
        assert_eq!(service.get(&alice, &saved.id).await.unwrap().title, "Calculus");
    }

    #[tokio::test]
    async fn test_rename_onto_existing_title() {
        let (stores, service) = setup(StoreBackend::Relational).await;
        let ctx = owner(&stores, "a@test.com").await;
        service.save(&ctx, "Calculus", None).await.unwrap();
        let other = service.save(&ctx, "Geometry", None).await.unwrap();

        let err = service.rename(&ctx, &other.id, "CALCULUS").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateTitle);
        let renamed = service.rename(&ctx, &other.id, " Trigonometry ").await.unwrap();
        assert_eq!(renamed.title, "Trigonometry");
    }

    #[tokio::test]
    async fn test_foreign_id_matches_nothing() {
        let (stores, service) = setup(StoreBackend::Relational).await;
        let ctx = owner(&stores, "a@test.com").await;
        let err = service
            .get(&ctx, &SavedTopicId::new("65f0c2a1b3d4e5f6a7b8c9d0"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
