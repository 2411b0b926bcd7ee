//! Document backend: schemaless JSON collections held in process.
//!
//! Each collection keeps its own unique indexes (normalized email for
//! identities, owner plus title key for saved topics). Ids are 24-character
//! hex strings, so ids issued by the relational backend never match here.
//! When a snapshot path is configured the whole database is written to one
//! JSON file by a background flusher and on close.

mod codec;
pub mod catalog;
pub mod database;
pub mod engine;
pub mod identity;
pub mod object_id;
pub mod resource;
pub mod saved_topic;

pub use catalog::CatalogDocuments;
pub use database::DocumentDatabase;
pub use identity::IdentityDocuments;
pub use resource::ResourceDocuments;
pub use saved_topic::SavedTopicDocuments;
