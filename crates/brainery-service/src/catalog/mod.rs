//! Shared study catalog.

pub mod service;

pub use service::{CatalogService, SeedReport, SeedSubject, SeedTopic};
