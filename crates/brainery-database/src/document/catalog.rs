//! Catalog store for the document backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;
use brainery_core::types::{SubjectId, TopicId};
use brainery_entity::catalog::{CatalogTopic, NewCatalogTopic, NewSubject, Subject};

use super::codec::{now, nullable, object, optional_text, text, timestamp};
use super::database::DocumentDatabase;
use super::engine::{Document, EngineError, Filter, ID_FIELD, Sort, SortOrder};
use crate::store::{CatalogStore, non_blank};

fn decode_subject(doc: &Document) -> AppResult<Subject> {
    Ok(Subject {
        id: SubjectId::new(text(doc, ID_FIELD)?),
        name: text(doc, "name")?,
        icon: optional_text(doc, "icon"),
        created_at: timestamp(doc, "created_at")?,
    })
}

fn decode_topic(doc: &Document) -> AppResult<CatalogTopic> {
    Ok(CatalogTopic {
        id: TopicId::new(text(doc, ID_FIELD)?),
        subject_id: SubjectId::new(text(doc, "subject_id")?),
        title: text(doc, "title")?,
        description: optional_text(doc, "description"),
        created_at: timestamp(doc, "created_at")?,
    })
}

/// Subject and topic documents.
#[derive(Debug, Clone)]
pub struct CatalogDocuments {
    db: Arc<DocumentDatabase>,
}

impl CatalogDocuments {
    /// Create a new catalog store over the given database.
    pub fn new(db: Arc<DocumentDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for CatalogDocuments {
    async fn list_subjects(&self) -> AppResult<Vec<Subject>> {
        self.db
            .subjects
            .find(&Filter::all(), &Sort::by("name", SortOrder::Asc), 0, None)
            .iter()
            .map(decode_subject)
            .collect()
    }

    async fn find_subject(&self, id: &SubjectId) -> AppResult<Option<Subject>> {
        self.db
            .subjects
            .find_by_id(id.as_str())
            .map(|doc| decode_subject(&doc))
            .transpose()
    }

    async fn list_topics(&self, subject: &SubjectId) -> AppResult<Vec<CatalogTopic>> {
        self.db
            .topics
            .find(
                &Filter::all().eq("subject_id", subject.as_str()),
                &Sort::by("title", SortOrder::Asc),
                0,
                None,
            )
            .iter()
            .map(decode_topic)
            .collect()
    }

    async fn find_topic_by_title(&self, title: &str) -> AppResult<Option<CatalogTopic>> {
        let wanted = title.trim();
        self.db
            .topics
            .dump()
            .into_iter()
            .find(|doc| {
                doc.get("title")
                    .and_then(|v| v.as_str())
                    .is_some_and(|t| t.eq_ignore_ascii_case(wanted))
            })
            .map(|doc| decode_topic(&doc))
            .transpose()
    }

    async fn upsert_subject(&self, subject: &NewSubject) -> AppResult<Subject> {
        let name = subject.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_field("name", "Subject name is required"));
        }
        let icon = nullable(non_blank(subject.icon.as_deref()));

        let inserted = self.db.subjects.insert_one(object(json!({
            "name": name,
            "icon": icon.clone(),
            "created_at": now(),
        })));
        let doc = match inserted {
            Ok(id) => self.db.subjects.find_by_id(&id),
            Err(EngineError::DuplicateKey { .. }) => self
                .db
                .subjects
                .update_one(&Filter::all().eq("name", name), object(json!({ "icon": icon })))
                .map_err(|e| AppError::store("Failed to upsert subject", e))?,
            Err(e) => return Err(AppError::store("Failed to upsert subject", e)),
        };
        let doc = doc.ok_or_else(|| AppError::internal("Subject vanished during upsert"))?;
        decode_subject(&doc)
    }

    async fn upsert_topic(
        &self,
        subject: &SubjectId,
        topic: &NewCatalogTopic,
    ) -> AppResult<CatalogTopic> {
        if self.db.subjects.find_by_id(subject.as_str()).is_none() {
            return Err(AppError::not_found(format!("Subject {subject} not found")));
        }
        let title = topic.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_field("title", "Topic title is required"));
        }
        let description = nullable(non_blank(topic.description.as_deref()));

        let inserted = self.db.topics.insert_one(object(json!({
            "subject_id": subject.as_str(),
            "title": title,
            "description": description.clone(),
            "created_at": now(),
        })));
        let doc = match inserted {
            Ok(id) => self.db.topics.find_by_id(&id),
            Err(EngineError::DuplicateKey { .. }) => self
                .db
                .topics
                .update_one(
                    &Filter::all()
                        .eq("subject_id", subject.as_str())
                        .eq("title", title),
                    object(json!({ "description": description })),
                )
                .map_err(|e| AppError::store("Failed to upsert topic", e))?,
            Err(e) => return Err(AppError::store("Failed to upsert topic", e)),
        };
        let doc = doc.ok_or_else(|| AppError::internal("Topic vanished during upsert"))?;
        decode_topic(&doc)
    }
}
