//! Shared, read-only study catalog: subjects and their topics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brainery_core::types::{SubjectId, TopicId};

/// A subject area, e.g. "Mathematics".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Opaque identifier.
    pub id: SubjectId,
    /// Unique name.
    pub name: String,
    /// Icon name or URL shown next to the subject.
    pub icon: Option<String>,
    /// When the subject was created.
    pub created_at: DateTime<Utc>,
}

/// A topic within a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTopic {
    /// Opaque identifier.
    pub id: TopicId,
    /// Parent subject.
    pub subject_id: SubjectId,
    /// Topic title.
    pub title: String,
    /// Description, used to backfill saved-topic summaries.
    pub description: Option<String>,
    /// When the topic was created.
    pub created_at: DateTime<Utc>,
}

/// Subject data for catalog seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
    /// Unique name.
    pub name: String,
    /// Optional icon.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Topic data for catalog seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogTopic {
    /// Topic title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}
