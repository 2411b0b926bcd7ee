//! Owner-scoped record services.
//!
//! Every operation takes the owner from the request context, never from
//! client input.

pub mod resource;
pub mod saved_topic;

pub use resource::{ResourceDraft, ResourceService, ResourceUpdate};
pub use saved_topic::SavedTopicService;
