//! Resource entity: a link or note kept by one identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brainery_core::types::{IdentityId, ResourceId};

/// A study resource owned by one identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque identifier.
    pub id: ResourceId,
    /// Owning identity.
    pub owner_id: IdentityId,
    /// Title (required).
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// External link.
    pub link: Option<String>,
    /// Category label, e.g. "video" or "article".
    pub category: Option<String>,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a resource.
#[derive(Debug, Clone, Default)]
pub struct NewResource {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional link.
    pub link: Option<String>,
    /// Optional category.
    pub category: Option<String>,
}

/// Whitelisted changes to a resource. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
    /// New title; must be non-empty when present.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New link.
    pub link: Option<Option<String>>,
    /// New category.
    pub category: Option<Option<String>>,
}

impl ResourcePatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.link.is_none()
            && self.category.is_none()
    }

    /// Apply the patch to a resource in place.
    pub fn apply(&self, resource: &mut Resource) {
        if let Some(title) = &self.title {
            resource.title = title.clone();
        }
        if let Some(description) = &self.description {
            resource.description = description.clone();
        }
        if let Some(link) = &self.link {
            resource.link = link.clone();
        }
        if let Some(category) = &self.category {
            resource.category = category.clone();
        }
    }
}
