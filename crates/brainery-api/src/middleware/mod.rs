//! Axum middleware stack.

pub mod cors;
pub mod csrf;
pub mod logging;
