//! # brainery-core
//!
//! Core crate for Brainery. Contains configuration schemas, opaque record
//! identifiers, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Brainery crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
