//! Saved topic entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brainery_core::types::{IdentityId, SavedTopicId};

/// Summary shown when neither the caller nor the catalog supplies one.
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Uniqueness key for a saved topic title within one owner's records.
///
/// Titles are compared trimmed and case-insensitively, so `"Calculus"` and
/// `" calculus "` collide.
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// A topic bookmarked by one identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTopic {
    /// Opaque identifier.
    pub id: SavedTopicId,
    /// Owning identity.
    pub owner_id: IdentityId,
    /// Title as entered (trimmed).
    pub title: String,
    /// Summary text; may be the placeholder.
    pub summary: String,
    /// When the topic was saved.
    pub created_at: DateTime<Utc>,
}

impl SavedTopic {
    /// The normalized uniqueness key of this record.
    pub fn title_key(&self) -> String {
        title_key(&self.title)
    }
}

/// Data required to save a topic. Title is already trimmed and non-empty.
#[derive(Debug, Clone)]
pub struct NewSavedTopic {
    /// Trimmed title.
    pub title: String,
    /// Resolved summary (caller-supplied, catalog backfill, or placeholder).
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_key_ignores_case_and_padding() {
        assert_eq!(title_key("  Calculus "), "calculus");
        assert_eq!(title_key("CALCULUS"), title_key("calculus"));
        assert_ne!(title_key("Linear Algebra"), title_key("LinearAlgebra"));
    }
}
