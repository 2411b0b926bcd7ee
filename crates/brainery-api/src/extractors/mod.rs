//! Custom Axum extractors.

pub mod auth;
pub mod pagination;
pub mod validated;

pub use auth::{AuthUser, SessionToken, TokenSource};
pub use pagination::PaginationParams;
pub use validated::ValidatedJson;
