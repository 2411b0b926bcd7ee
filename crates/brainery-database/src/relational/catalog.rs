//! Catalog repository for the relational backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{SubjectId, TopicId};
use brainery_entity::catalog::{CatalogTopic, NewCatalogTopic, NewSubject, Subject};

use super::integer_key;
use crate::store::{CatalogStore, non_blank, timestamp_text};

#[derive(Debug, FromRow)]
struct SubjectRow {
    id: i64,
    name: String,
    icon: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: SubjectId::from(row.id),
            name: row.name,
            icon: row.icon,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TopicRow {
    id: i64,
    subject_id: i64,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TopicRow> for CatalogTopic {
    fn from(row: TopicRow) -> Self {
        Self {
            id: TopicId::from(row.id),
            subject_id: SubjectId::from(row.subject_id),
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Repository for subjects and catalog topics.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn list_subjects(&self) -> AppResult<Vec<Subject>> {
        sqlx::query_as::<_, SubjectRow>(
            "SELECT id, name, icon, created_at FROM subjects ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Subject::from).collect())
        .map_err(|e| AppError::store("Failed to list subjects", e))
    }

    async fn find_subject(&self, id: &SubjectId) -> AppResult<Option<Subject>> {
        let Some(key) = integer_key(id) else {
            return Ok(None);
        };
        sqlx::query_as::<_, SubjectRow>(
            "SELECT id, name, icon, created_at FROM subjects WHERE id = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Subject::from))
        .map_err(|e| AppError::store("Failed to find subject", e))
    }

    async fn list_topics(&self, subject: &SubjectId) -> AppResult<Vec<CatalogTopic>> {
        let Some(key) = integer_key(subject) else {
            return Ok(Vec::new());
        };
        sqlx::query_as::<_, TopicRow>(
            "SELECT id, subject_id, title, description, created_at FROM topics \
             WHERE subject_id = ? ORDER BY title ASC, id ASC",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(CatalogTopic::from).collect())
        .map_err(|e| AppError::store("Failed to list topics", e))
    }

    async fn find_topic_by_title(&self, title: &str) -> AppResult<Option<CatalogTopic>> {
        sqlx::query_as::<_, TopicRow>(
            "SELECT id, subject_id, title, description, created_at FROM topics \
             WHERE title = ? COLLATE NOCASE ORDER BY id ASC LIMIT 1",
        )
        .bind(title.trim())
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(CatalogTopic::from))
        .map_err(|e| AppError::store("Failed to find topic by title", e))
    }

    async fn upsert_subject(&self, subject: &NewSubject) -> AppResult<Subject> {
        let name = subject.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_field("name", "Subject name is required"));
        }
        sqlx::query_as::<_, SubjectRow>(
            "INSERT INTO subjects (name, icon, created_at) VALUES (?, ?, ?) \
             ON CONFLICT (name) DO UPDATE SET icon = excluded.icon \
             RETURNING id, name, icon, created_at",
        )
        .bind(name)
        .bind(non_blank(subject.icon.as_deref()))
        .bind(timestamp_text(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map(Subject::from)
        .map_err(|e| AppError::store("Failed to upsert subject", e))
    }

    async fn upsert_topic(
        &self,
        subject: &SubjectId,
        topic: &NewCatalogTopic,
    ) -> AppResult<CatalogTopic> {
        let Some(key) = integer_key(subject) else {
            return Err(AppError::not_found(format!("Subject {subject} not found")));
        };
        let title = topic.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_field("title", "Topic title is required"));
        }
        sqlx::query_as::<_, TopicRow>(
            "INSERT INTO topics (subject_id, title, description, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (subject_id, title) DO UPDATE SET description = excluded.description \
             RETURNING id, subject_id, title, description, created_at",
        )
        .bind(key)
        .bind(title)
        .bind(non_blank(topic.description.as_deref()))
        .bind(timestamp_text(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map(CatalogTopic::from)
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
                AppError::not_found(format!("Subject {subject} not found"))
            } else {
                AppError::store("Failed to upsert topic", e)
            }
        })
    }
}
