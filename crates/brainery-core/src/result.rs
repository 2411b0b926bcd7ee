//! Convenience result type alias for Brainery.

use crate::error::AppError;

/// A specialized `Result` type for Brainery operations.
pub type AppResult<T> = Result<T, AppError>;
