//! # brainery-service
//!
//! Business logic service layer for Brainery. Each service orchestrates the
//! stores and the auth building blocks to implement one group of use cases.
//!
//! Services follow constructor injection: every dependency is provided at
//! construction time via `Arc` references, so the same service runs over
//! either store backend.

pub mod admin;
pub mod catalog;
pub mod context;
pub mod identity;
pub mod record;

pub use admin::{AdminOverview, AdminService};
pub use catalog::{CatalogService, SeedReport, SeedSubject, SeedTopic};
pub use context::RequestContext;
pub use identity::{IdentityResolver, LoginOutcome, Registration, ResolvedSession};
pub use record::{ResourceDraft, ResourceService, ResourceUpdate, SavedTopicService};
