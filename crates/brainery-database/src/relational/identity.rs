//! Identity repository for the relational backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, Page, PageRequest};
use brainery_entity::identity::{Identity, NewIdentity, Role, normalize_email};

use super::{integer_key, is_unique_violation};
use crate::store::{CredentialStore, timestamp_text};

const SELECT_IDENTITY: &str =
    "SELECT id, username, email, email_normalized, password_hash, role, created_at FROM users";

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    email: String,
    email_normalized: String,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            id: IdentityId::from(row.id),
            username: row.username,
            email: row.email,
            email_normalized: row.email_normalized,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// Repository for identity CRUD and query operations.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    /// Create a new identity repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for IdentityRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        sqlx::query_as::<_, IdentityRow>(&format!(
            "{SELECT_IDENTITY} WHERE email_normalized = ?"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Identity::from))
        .map_err(|e| AppError::store("Failed to find identity by email", e))
    }

    async fn find_by_id(&self, id: &IdentityId) -> AppResult<Option<Identity>> {
        let Some(key) = integer_key(id) else {
            return Ok(None);
        };
        sqlx::query_as::<_, IdentityRow>(&format!("{SELECT_IDENTITY} WHERE id = ?"))
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Identity::from))
            .map_err(|e| AppError::store("Failed to find identity by id", e))
    }

    async fn create(&self, draft: &NewIdentity) -> AppResult<Identity> {
        let email_normalized = draft.email_normalized();
        let row = sqlx::query_as::<_, IdentityRow>(
            "INSERT INTO users (username, email, email_normalized, password_hash, role, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, username, email, email_normalized, password_hash, role, created_at",
        )
        .bind(draft.username.trim())
        .bind(draft.email.trim())
        .bind(&email_normalized)
        .bind(&draft.password_hash)
        .bind(draft.role)
        .bind(timestamp_text(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate_identity("An account with this email already exists")
            } else {
                AppError::store("Failed to create identity", e)
            }
        })?;

        info!(identity_id = row.id, "Identity created");
        Ok(row.into())
    }

    async fn update_password(&self, id: &IdentityId, password_hash: &str) -> AppResult<bool> {
        let Some(key) = integer_key(id) else {
            return Ok(false);
        };
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::store("Failed to update password", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_role(&self, id: &IdentityId, role: Role) -> AppResult<bool> {
        let Some(key) = integer_key(id) else {
            return Ok(false);
        };
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::store("Failed to update role", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &IdentityId) -> AppResult<bool> {
        let Some(key) = integer_key(id) else {
            return Ok(false);
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::store("Failed to begin transaction", e))?;

        for statement in [
            "DELETE FROM saved_topics WHERE user_id = ?",
            "DELETE FROM resources WHERE user_id = ?",
        ] {
            sqlx::query(statement)
                .bind(key)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::store("Failed to delete owned records", e))?;
        }

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(key)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::store("Failed to delete identity", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::store("Failed to commit identity deletion", e))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(identity_id = key, "Identity deleted with owned records");
        }
        Ok(deleted)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<Page<Identity>> {
        let total = self.count().await?;
        let rows = sqlx::query_as::<_, IdentityRow>(&format!(
            "{SELECT_IDENTITY} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::store("Failed to list identities", e))?;

        Ok(Page::new(
            rows.into_iter().map(Identity::from).collect(),
            page,
            total,
        ))
    }

    async fn count(&self) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map(|n| n as u64)
            .map_err(|e| AppError::store("Failed to count identities", e))
    }

    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map(|n| n as u64)
            .map_err(|e| AppError::store("Failed to count identities by role", e))
    }
}
