//! Relational backend: SQLite through sqlx.
//!
//! Uniqueness of normalized emails and per-owner topic titles is enforced
//! by unique indexes, so a racing duplicate insert always loses inside the
//! database rather than in application code.

pub mod catalog;
pub mod connection;
pub mod identity;
pub mod migration;
pub mod resource;
pub mod saved_topic;

pub use catalog::CatalogRepository;
pub use connection::DatabasePool;
pub use identity::IdentityRepository;
pub use migration::run_migrations;
pub use resource::ResourceRepository;
pub use saved_topic::SavedTopicRepository;

/// Integer row key behind an opaque id. Ids issued by another backend are
/// not numeric and therefore match no row.
pub(crate) fn integer_key(id: &impl AsRef<str>) -> Option<i64> {
    id.as_ref().parse().ok()
}

/// Whether the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::types::IdentityId;

    #[test]
    fn test_integer_key() {
        assert_eq!(integer_key(&IdentityId::from(42)), Some(42));
        assert_eq!(integer_key(&IdentityId::new("65f1c0ffee00000000000001")), None);
    }
}
