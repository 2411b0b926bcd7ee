//! Resources: personal links and notes.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use brainery_core::error::AppError;
use brainery_core::types::ResourceId;
use brainery_database::ResourceStore;
use brainery_entity::record::{NewResource, Resource, ResourcePatch};

use crate::context::RequestContext;

/// A resource as submitted for creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Changes submitted for an existing resource. Absent fields are left
/// alone; a blank optional field is cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ResourceUpdate {
    fn into_patch(self) -> Result<ResourcePatch, AppError> {
        let title = match self.title {
            Some(title) if title.trim().is_empty() => {
                return Err(AppError::invalid_field("title", "Title is required."));
            }
            other => other.map(|t| t.trim().to_string()),
        };
        let patch = ResourcePatch {
            title,
            description: self.description.map(|v| trimmed(Some(v))),
            link: self.link.map(|v| trimmed(Some(v))),
            category: self.category.map(|v| trimmed(Some(v))),
        };
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied"));
        }
        Ok(patch)
    }
}

/// Resource use cases for the calling identity.
#[derive(Clone)]
pub struct ResourceService {
    resources: Arc<dyn ResourceStore>,
}

impl ResourceService {
    /// Creates a new resource service.
    pub fn new(resources: Arc<dyn ResourceStore>) -> Self {
        Self { resources }
    }

    /// Adds a resource owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, draft: ResourceDraft) -> Result<Resource, AppError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_field("title", "Title is required."));
        }
        let resource = self
            .resources
            .create(
                &ctx.identity_id,
                &NewResource {
                    title: title.to_string(),
                    description: trimmed(draft.description),
                    link: trimmed(draft.link),
                    category: trimmed(draft.category),
                },
            )
            .await?;
        info!(identity_id = %ctx.identity_id, resource_id = %resource.id, "Resource added");
        Ok(resource)
    }

    /// The caller's resources, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Resource>, AppError> {
        self.resources.list_for_owner(&ctx.identity_id).await
    }

    /// One of the caller's resources.
    pub async fn get(&self, ctx: &RequestContext, id: &ResourceId) -> Result<Resource, AppError> {
        self.resources
            .get(&ctx.identity_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))
    }

    /// Applies changes to one of the caller's resources.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &ResourceId,
        update: ResourceUpdate,
    ) -> Result<Resource, AppError> {
        let patch = update.into_patch()?;
        let resource = self
            .resources
            .update(&ctx.identity_id, id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;
        info!(identity_id = %ctx.identity_id, resource_id = %id, "Resource updated");
        Ok(resource)
    }

    /// Removes one of the caller's resources.
    pub async fn delete(&self, ctx: &RequestContext, id: &ResourceId) -> Result<(), AppError> {
        if !self.resources.delete(&ctx.identity_id, id).await? {
            return Err(AppError::not_found("Resource not found"));
        }
        info!(identity_id = %ctx.identity_id, resource_id = %id, "Resource deleted");
        Ok(())
    }
}

impl std::fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::config::StoreBackend;
    use brainery_core::error::ErrorKind;
    use brainery_database::StoreSet;
    use brainery_entity::identity::{NewIdentity, Role};
    use rstest::rstest;
    use uuid::Uuid;

    async fn owner(stores: &StoreSet, email: &str) -> RequestContext {
        let identity = stores
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

    fn draft(title: &str) -> ResourceDraft {
        ResourceDraft {
            title: title.into(),
            description: Some(" Free lessons ".into()),
            link: Some("https://khanacademy.org".into()),
            category: Some("  ".into()),
        }
    }

    #[test]
    fn test_update_normalization() {
        let patch = ResourceUpdate {
            title: Some(" New ".into()),
            link: Some("   ".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert_eq!(patch.link, Some(None));
        assert!(patch.description.is_none());

        let err = ResourceUpdate::default().into_patch().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = ResourceUpdate {
            title: Some(" ".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("title"));
    }

    #[rstest]
    #[case::relational(StoreBackend::Relational)]
    #[case::document(StoreBackend::Document)]
    #[tokio::test]
    async fn test_resource_lifecycle(#[case] backend: StoreBackend) {
        let stores = StoreSet::in_memory(backend).await.unwrap();
        let service = ResourceService::new(Arc::clone(&stores.resources));
        let ctx = owner(&stores, "a@test.com").await;

        let created = service.create(&ctx, draft(" Khan Academy ")).await.unwrap();
        assert_eq!(created.title, "Khan Academy");
        assert_eq!(created.description.as_deref(), Some("Free lessons"));
        assert!(created.category.is_none());

        let updated = service
            .update(
                &ctx,
                &created.id,
                ResourceUpdate {
                    category: Some("video".into()),
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.category.as_deref(), Some("video"));
        assert!(updated.description.is_none());
        assert_eq!(updated.link.as_deref(), Some("https://khanacademy.org"));

        service.delete(&ctx, &created.id).await.unwrap();
        assert!(service.list(&ctx).await.unwrap().is_empty());
    }

    #[rstest]
    #[case::relational(StoreBackend::Relational)]
    #[case::document(StoreBackend::Document)]
    #[tokio::test]
    async fn test_other_owner_cannot_touch(#[case] backend: StoreBackend) {
        let stores = StoreSet::in_memory(backend).await.unwrap();
        let service = ResourceService::new(Arc::clone(&stores.resources));
        let alice = owner(&stores, "a@test.com").await;
        let bob = owner(&stores, "b@test.com").await;
        let created = service.create(&alice, draft("Notes")).await.unwrap();

        let update = ResourceUpdate {
            title: Some("Stolen".into()),
            ..Default::default()
        };
        assert_eq!(
            service.update(&bob, &created.id, update).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            service.delete(&bob, &created.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(service.get(&alice, &created.id).await.unwrap().title, "Notes");
    }
}
