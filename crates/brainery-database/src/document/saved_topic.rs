//! Saved topic store for the document backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{IdentityId, SavedTopicId};
use brainery_entity::record::{NewSavedTopic, SavedTopic, title_key};

use super::codec::{now, object, text, timestamp};
use super::database::DocumentDatabase;
use super::engine::{Document, EngineError, Filter, ID_FIELD, Sort, SortOrder};
use crate::store::SavedTopicStore;

const DUPLICATE_MESSAGE: &str = "Topic already saved!";

fn decode(doc: &Document) -> AppResult<SavedTopic> {
    Ok(SavedTopic {
        id: SavedTopicId::new(text(doc, ID_FIELD)?),
        owner_id: IdentityId::new(text(doc, "user_id")?),
        title: text(doc, "title")?,
        summary: text(doc, "summary")?,
        created_at: timestamp(doc, "created_at")?,
    })
}

fn owned(owner: &IdentityId, id: &SavedTopicId) -> Filter {
    Filter::all()
        .eq(ID_FIELD, id.as_str())
        .eq("user_id", owner.as_str())
}

fn map_write_error(context: &'static str) -> impl Fn(EngineError) -> AppError {
    move |e| match e {
        EngineError::DuplicateKey { .. } => AppError::duplicate_title(DUPLICATE_MESSAGE),
        other => AppError::store(context, other),
    }
}

/// Saved topic documents, keyed by owner.
#[derive(Debug, Clone)]
pub struct SavedTopicDocuments {
    db: Arc<DocumentDatabase>,
}

impl SavedTopicDocuments {
    /// Create a new saved topic store over the given database.
    pub fn new(db: Arc<DocumentDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SavedTopicStore for SavedTopicDocuments {
    async fn create(&self, owner: &IdentityId, draft: &NewSavedTopic) -> AppResult<SavedTopic> {
        let doc = object(json!({
            "user_id": owner.as_str(),
            "title": draft.title.trim(),
            "title_key": title_key(&draft.title),
            "summary": draft.summary,
            "created_at": now(),
        }));
        let id = {
            let _owner = self.db.lock_owner(owner.as_str())?;
            self.db
                .saved_topics
                .insert_one(doc)
                .map_err(map_write_error("Failed to save topic"))?
        };

        debug!(owner_id = %owner, topic_id = %id, "Saved topic created");
        let stored = self
            .db
            .saved_topics
            .find_by_id(&id)
            .ok_or_else(|| AppError::internal("Saved topic vanished after insert"))?;
        decode(&stored)
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> AppResult<Vec<SavedTopic>> {
        self.db
            .saved_topics
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

    async fn get(&self, owner: &IdentityId, id: &SavedTopicId) -> AppResult<Option<SavedTopic>> {
        self.db
            .saved_topics
            .find_one(&owned(owner, id))
            .map(|doc| decode(&doc))
            .transpose()
    }

    async fn rename(
        &self,
        owner: &IdentityId,
        id: &SavedTopicId,
        title: &str,
    ) -> AppResult<Option<SavedTopic>> {
        self.db
            .saved_topics
            .update_one(
                &owned(owner, id),
                object(json!({
                    "title": title.trim(),
                    "title_key": title_key(title),
                })),
            )
            .map_err(map_write_error("Failed to rename saved topic"))?
            .map(|doc| decode(&doc))
            .transpose()
    }

    async fn delete(&self, owner: &IdentityId, id: &SavedTopicId) -> AppResult<bool> {
        self.db
            .saved_topics
            .delete_one(&owned(owner, id))
            .map(|removed| removed.is_some())
            .map_err(|e| AppError::store("Failed to delete saved topic", e))
    }
}
