//! # brainery-database
//!
//! Persistence for identities, owner-scoped records, and the study catalog.
//!
//! Two interchangeable backends implement the traits in [`store`]:
//!
//! - [`relational`]: SQLite through sqlx, uniqueness enforced by indexes.
//! - [`document`]: an embedded schemaless JSON document store with unique
//!   indexes checked inside each collection's write critical section.
//!
//! [`backend::StoreSet`] picks one according to configuration; callers only
//! ever see the trait objects. [`transfer`] copies one backend into another.

pub mod backend;
pub mod document;
pub mod relational;
pub mod store;
pub mod transfer;

pub use backend::StoreSet;
pub use store::{CatalogStore, CredentialStore, ResourceStore, SavedTopicStore, StoreHealth};
pub use transfer::{TransferReport, transfer};
