//! Saved topic repository for the relational backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, SavedTopicId};
use brainery_entity::record::{NewSavedTopic, SavedTopic, title_key};

use super::{integer_key, is_foreign_key_violation, is_unique_violation};
use crate::store::{SavedTopicStore, timestamp_text};

const DUPLICATE_MESSAGE: &str = "Topic already saved!";

#[derive(Debug, FromRow)]
struct SavedTopicRow {
    id: i64,
    user_id: i64,
    title: String,
    summary: String,
    created_at: DateTime<Utc>,
}

impl From<SavedTopicRow> for SavedTopic {
    fn from(row: SavedTopicRow) -> Self {
        Self {
            id: SavedTopicId::from(row.id),
            owner_id: IdentityId::from(row.user_id),
            title: row.title,
            summary: row.summary,
            created_at: row.created_at,
        }
    }
}

/// Repository for saved topics, always filtered by owner.
#[derive(Debug, Clone)]
pub struct SavedTopicRepository {
    pool: SqlitePool,
}

impl SavedTopicRepository {
    /// Create a new saved topic repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedTopicStore for SavedTopicRepository {
    async fn create(&self, owner: &IdentityId, draft: &NewSavedTopic) -> AppResult<SavedTopic> {
        let Some(owner_key) = integer_key(owner) else {
            return Err(AppError::not_found("Owner not found"));
        };

        let row = sqlx::query_as::<_, SavedTopicRow>(
            "INSERT INTO saved_topics (user_id, title, title_key, summary, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, user_id, title, summary, created_at",
        )
        .bind(owner_key)
        .bind(draft.title.trim())
        .bind(title_key(&draft.title))
        .bind(&draft.summary)
        .bind(timestamp_text(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate_title(DUPLICATE_MESSAGE)
            } else if is_foreign_key_violation(&e) {
                AppError::not_found("Owner not found")
            } else {
                AppError::store("Failed to save topic", e)
            }
        })?;

        debug!(owner_id = owner_key, topic_id = row.id, "Saved topic created");
        Ok(row.into())
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> AppResult<Vec<SavedTopic>> {
        let Some(owner_key) = integer_key(owner) else {
            return Ok(Vec::new());
        };
        sqlx::query_as::<_, SavedTopicRow>(
            "SELECT id, user_id, title, summary, created_at FROM saved_topics \
             WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_key)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(SavedTopic::from).collect())
        .map_err(|e| AppError::store("Failed to list saved topics", e))
    }

    async fn get(&self, owner: &IdentityId, id: &SavedTopicId) -> AppResult<Option<SavedTopic>> {
        let (Some(owner_key), Some(key)) = (integer_key(owner), integer_key(id)) else {
            return Ok(None);
        };
        sqlx::query_as::<_, SavedTopicRow>(
            "SELECT id, user_id, title, summary, created_at FROM saved_topics \
             WHERE id = ? AND user_id = ?",
        )
        .bind(key)
        .bind(owner_key)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(SavedTopic::from))
        .map_err(|e| AppError::store("Failed to get saved topic", e))
    }

    async fn rename(
        &self,
        owner: &IdentityId,
        id: &SavedTopicId,
        title: &str,
    ) -> AppResult<Option<SavedTopic>> {
        let (Some(owner_key), Some(key)) = (integer_key(owner), integer_key(id)) else {
            return Ok(None);
        };
        sqlx::query_as::<_, SavedTopicRow>(
            "UPDATE saved_topics SET title = ?, title_key = ? \
             WHERE id = ? AND user_id = ? \
             RETURNING id, user_id, title, summary, created_at",
        )
        .bind(title.trim())
        .bind(title_key(title))
        .bind(key)
        .bind(owner_key)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(SavedTopic::from))
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate_title(DUPLICATE_MESSAGE)
            } else {
                AppError::store("Failed to rename saved topic", e)
            }
        })
    }

    async fn delete(&self, owner: &IdentityId, id: &SavedTopicId) -> AppResult<bool> {
        let (Some(owner_key), Some(key)) = (integer_key(owner), integer_key(id)) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM saved_topics WHERE id = ? AND user_id = ?")
            .bind(key)
            .bind(owner_key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::store("Failed to delete saved topic", e))?;
        Ok(result.rows_affected() > 0)
    }
}
