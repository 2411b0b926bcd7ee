//! Owner-scoped records: saved topics and resources.

pub mod resource;
pub mod saved_topic;

pub use resource::{NewResource, Resource, ResourcePatch};
pub use saved_topic::{NO_SUMMARY_PLACEHOLDER, NewSavedTopic, SavedTopic, title_key};
