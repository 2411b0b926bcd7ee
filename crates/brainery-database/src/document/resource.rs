//! Resource store for the document backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, ResourceId};
use brainery_entity::record::{NewResource, Resource, ResourcePatch};

use super::codec::{now, nullable, object, optional_text, text, timestamp};
use super::database::DocumentDatabase;
use super::engine::{Document, Filter, ID_FIELD, Sort, SortOrder};
use crate::store::{ResourceStore, non_blank};

fn decode(doc: &Document) -> AppResult<Resource> {
    Ok(Resource {
        id: ResourceId::new(text(doc, ID_FIELD)?),
        owner_id: IdentityId::new(text(doc, "user_id")?),
        title: text(doc, "title")?,
        description: optional_text(doc, "description"),
        link: optional_text(doc, "link"),
        category: optional_text(doc, "category"),
        created_at: timestamp(doc, "created_at")?,
    })
}

fn owned(owner: &IdentityId, id: &ResourceId) -> Filter {
    Filter::all()
        .eq(ID_FIELD, id.as_str())
        .eq("user_id", owner.as_str())
}

/// Only whitelisted fields ever reach the stored document.
fn patch_document(patch: &ResourcePatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title".into(), json!(title.trim()));
    }
    for (field, value) in [
        ("description", &patch.description),
        ("link", &patch.link),
        ("category", &patch.category),
    ] {
        if let Some(value) = value {
            set.insert(field.into(), nullable(value.clone()));
        }
    }
    set
}

/// Resource documents, keyed by owner.
#[derive(Debug, Clone)]
pub struct ResourceDocuments {
    db: Arc<DocumentDatabase>,
}

impl ResourceDocuments {
    /// Create a new resource store over the given database.
    pub fn new(db: Arc<DocumentDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceStore for ResourceDocuments {
    async fn create(&self, owner: &IdentityId, draft: &NewResource) -> AppResult<Resource> {
        let doc = object(json!({
            "user_id": owner.as_str(),
            "title": draft.title.trim(),
            "description": nullable(non_blank(draft.description.as_deref())),
            "link": nullable(non_blank(draft.link.as_deref())),
            "category": nullable(non_blank(draft.category.as_deref())),
            "created_at": now(),
        }));
        let id = {
            let _owner = self.db.lock_owner(owner.as_str())?;
            self.db
                .resources
                .insert_one(doc)
                .map_err(|e| AppError::store("Failed to create resource", e))?
        };
        let stored = self
            .db
            .resources
            .find_by_id(&id)
            .ok_or_else(|| AppError::internal("Resource vanished after insert"))?;
        decode(&stored)
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> AppResult<Vec<Resource>> {
        self.db
            .resources
            .find(
                &Filter::all().eq("user_id", owner.as_str()),
                &Sort::by("created_at", SortOrder::Desc),
                0,
                None,
            )
            .iter()
            .map(decode)
            .collect()
    }

    async fn get(&self, owner: &IdentityId, id: &ResourceId) -> AppResult<Option<Resource>> {
        self.db
            .resources
            .find_one(&owned(owner, id))
            .map(|doc| decode(&doc))
            .transpose()
    }

    async fn update(
        &self,
        owner: &IdentityId,
        id: &ResourceId,
        patch: &ResourcePatch,
    ) -> AppResult<Option<Resource>> {
        self.db
            .resources
            .update_one(&owned(owner, id), patch_document(patch))
            .map_err(|e| AppError::store("Failed to update resource", e))?
            .map(|doc| decode(&doc))
            .transpose()
    }

    async fn delete(&self, owner: &IdentityId, id: &ResourceId) -> AppResult<bool> {
        self.db
            .resources
            .delete_one(&owned(owner, id))
            .map(|removed| removed.is_some())
            .map_err(|e| AppError::store("Failed to delete resource", e))
    }
}
