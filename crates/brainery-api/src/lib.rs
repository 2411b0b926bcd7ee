//! # brainery-api
//!
//! HTTP API layer for Brainery built on Axum.
//!
//! Provides the JSON endpoints, the session gate (`AuthUser` extractor), the
//! CSRF check for cookie-authenticated mutations, request logging, CORS, DTOs,
//! and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
