//! Identity store for the document backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, Page, PageRequest};
use brainery_entity::identity::{Identity, NewIdentity, Role, normalize_email};

use super::codec::{now, object, text, timestamp};
use super::database::DocumentDatabase;
use super::engine::{Document, EngineError, Filter, ID_FIELD, Sort, SortOrder};
use crate::store::CredentialStore;

fn decode(doc: &Document) -> AppResult<Identity> {
    Ok(Identity {
        id: IdentityId::new(text(doc, ID_FIELD)?),
        username: text(doc, "username")?,
        email: text(doc, "email")?,
        email_normalized: text(doc, "email_normalized")?,
        password_hash: text(doc, "password")?,
        role: text(doc, "role")?.parse()?,
        created_at: timestamp(doc, "created_at")?,
    })
}

fn by_id(id: &IdentityId) -> Filter {
    Filter::all().eq(ID_FIELD, id.as_str())
}

/// Identity documents in the `users` collection.
#[derive(Debug, Clone)]
pub struct IdentityDocuments {
    db: Arc<DocumentDatabase>,
}

impl IdentityDocuments {
    /// Create a new identity store over the given database.
    pub fn new(db: Arc<DocumentDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for IdentityDocuments {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        self.db
            .users
            .find_one(&Filter::all().eq("email_normalized", normalize_email(email)))
            .map(|doc| decode(&doc))
            .transpose()
    }

    async fn find_by_id(&self, id: &IdentityId) -> AppResult<Option<Identity>> {
        self.db
            .users
            .find_by_id(id.as_str())
            .map(|doc| decode(&doc))
            .transpose()
    }

    async fn create(&self, draft: &NewIdentity) -> AppResult<Identity> {
        let doc = object(json!({
            "username": draft.username.trim(),
            "email": draft.email.trim(),
            "email_normalized": draft.email_normalized(),
            "password": draft.password_hash,
            "role": draft.role.as_str(),
            "created_at": now(),
        }));

        let id = self.db.users.insert_one(doc).map_err(|e| match e {
            EngineError::DuplicateKey { .. } => {
                AppError::duplicate_identity("An account with this email already exists")
            }
            other => AppError::store("Failed to create identity", other),
        })?;

        info!(identity_id = %id, "Identity created");
        let stored = self
            .db
            .users
            .find_by_id(&id)
            .ok_or_else(|| AppError::internal("Created identity vanished"))?;
        decode(&stored)
    }

    async fn update_password(&self, id: &IdentityId, password_hash: &str) -> AppResult<bool> {
        self.db
            .users
            .update_one(&by_id(id), object(json!({ "password": password_hash })))
            .map(|updated| updated.is_some())
            .map_err(|e| AppError::store("Failed to update password", e))
    }

    async fn update_role(&self, id: &IdentityId, role: Role) -> AppResult<bool> {
        self.db
            .users
            .update_one(&by_id(id), object(json!({ "role": role.as_str() })))
            .map(|updated| updated.is_some())
            .map_err(|e| AppError::store("Failed to update role", e))
    }

    async fn delete(&self, id: &IdentityId) -> AppResult<bool> {
        let _cascade = self.db.lock_owners_exclusive()?;

        let deleted = self
            .db
            .users
            .delete_one(&by_id(id))
            .map_err(|e| AppError::store("Failed to delete identity", e))?
            .is_some();
        if !deleted {
            return Ok(false);
        }

        let owned = Filter::all().eq("user_id", id.as_str());
        let topics = self
            .db
            .saved_topics
            .delete_many(&owned)
            .map_err(|e| AppError::store("Failed to delete owned records", e))?;
        let resources = self
            .db
            .resources
            .delete_many(&owned)
            .map_err(|e| AppError::store("Failed to delete owned records", e))?;

        info!(identity_id = %id, topics, resources, "Identity deleted with owned records");
        Ok(true)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<Page<Identity>> {
        let total = self.db.users.count(&Filter::all());
        let docs = self.db.users.find(
            &Filter::all(),
            &Sort::by("created_at", SortOrder::Desc),
            usize::try_from(page.offset()).unwrap_or(usize::MAX),
            Some(page.limit() as usize),
        );
        let items = docs.iter().map(decode).collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, page, total))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.db.users.count(&Filter::all()))
    }

    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        Ok(self.db.users.count(&Filter::all().eq("role", role.as_str())))
    }
}
