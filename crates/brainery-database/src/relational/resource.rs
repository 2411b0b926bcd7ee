//! Resource repository for the relational backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, ResourceId};
use brainery_entity::record::{NewResource, Resource, ResourcePatch};

use super::{integer_key, is_foreign_key_violation};
use crate::store::{ResourceStore, non_blank, timestamp_text};

const RESOURCE_COLUMNS: &str = "id, user_id, title, description, link, category, created_at";

#[derive(Debug, FromRow)]
struct ResourceRow {
    id: i64,
    user_id: i64,
    title: String,
    description: Option<String>,
    link: Option<String>,
    category: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Self {
            id: ResourceId::from(row.id),
            owner_id: IdentityId::from(row.user_id),
            title: row.title,
            description: row.description,
            link: row.link,
            category: row.category,
            created_at: row.created_at,
        }
    }
}

/// Repository for resources, always filtered by owner.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: SqlitePool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for ResourceRepository {
    async fn create(&self, owner: &IdentityId, draft: &NewResource) -> AppResult<Resource> {
        let Some(owner_key) = integer_key(owner) else {
            return Err(AppError::not_found("Owner not found"));
        };
        sqlx::query_as::<_, ResourceRow>(&format!(
            "INSERT INTO resources (user_id, title, description, link, category, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {RESOURCE_COLUMNS}"
        ))
        .bind(owner_key)
        .bind(draft.title.trim())
        .bind(non_blank(draft.description.as_deref()))
        .bind(non_blank(draft.link.as_deref()))
        .bind(non_blank(draft.category.as_deref()))
        .bind(timestamp_text(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map(Resource::from)
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("Owner not found")
            } else {
                AppError::store("Failed to create resource", e)
            }
        })
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> AppResult<Vec<Resource>> {
        let Some(owner_key) = integer_key(owner) else {
            return Ok(Vec::new());
        };
        sqlx::query_as::<_, ResourceRow>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_key)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Resource::from).collect())
        .map_err(|e| AppError::store("Failed to list resources", e))
    }

    async fn get(&self, owner: &IdentityId, id: &ResourceId) -> AppResult<Option<Resource>> {
        let (Some(owner_key), Some(key)) = (integer_key(owner), integer_key(id)) else {
            return Ok(None);
        };
        sqlx::query_as::<_, ResourceRow>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = ? AND user_id = ?"
        ))
        .bind(key)
        .bind(owner_key)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Resource::from))
        .map_err(|e| AppError::store("Failed to get resource", e))
    }

    async fn update(
        &self,
        owner: &IdentityId,
        id: &ResourceId,
        patch: &ResourcePatch,
    ) -> AppResult<Option<Resource>> {
        let (Some(owner_key), Some(key)) = (integer_key(owner), integer_key(id)) else {
            return Ok(None);
        };

        // Each optional column is only written when the patch names it; the
        // flag columns keep the statement static.
        sqlx::query_as::<_, ResourceRow>(&format!(
            "UPDATE resources SET \
               title = COALESCE(?, title), \
               description = CASE WHEN ? THEN ? ELSE description END, \
               link = CASE WHEN ? THEN ? ELSE link END, \
               category = CASE WHEN ? THEN ? ELSE category END \
             WHERE id = ? AND user_id = ? RETURNING {RESOURCE_COLUMNS}"
        ))
        .bind(patch.title.as_deref().map(str::trim))
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.link.is_some())
        .bind(patch.link.clone().flatten())
        .bind(patch.category.is_some())
        .bind(patch.category.clone().flatten())
        .bind(key)
        .bind(owner_key)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Resource::from))
        .map_err(|e| AppError::store("Failed to update resource", e))
    }

    async fn delete(&self, owner: &IdentityId, id: &ResourceId) -> AppResult<bool> {
        let (Some(owner_key), Some(key)) = (integer_key(owner), integer_key(id)) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM resources WHERE id = ? AND user_id = ?")
            .bind(key)
            .bind(owner_key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::store("Failed to delete resource", e))?;
        Ok(result.rows_affected() > 0)
    }
}
