//! Server-side sessions: registry, lifecycle, and expiry cleanup.

pub mod cleanup;
pub mod manager;
pub mod record;
pub mod registry;

pub use cleanup::SessionCleanup;
pub use manager::{IssuedSession, SessionManager};
pub use record::{Landing, Notice, NoticeLevel, SessionRecord};
pub use registry::SessionRegistry;
