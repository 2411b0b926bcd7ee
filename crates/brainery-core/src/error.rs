//! Unified application error types for Brainery.
//!
//! Store backends, the password policy, and the session gate all map their
//! failures into [`AppError`]. Driver-specific errors never cross a crate
//! boundary; they are attached as `source` for operator logs only.

use std::fmt;
use thiserror::Error;

/// Message returned for every failed login, regardless of the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message returned when the backing store cannot serve a request.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "The service is temporarily unavailable";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input failed validation; usually carries a field name.
    Validation,
    /// Login failed. Unknown email and wrong password are not distinguished.
    InvalidCredentials,
    /// No valid session accompanies the request.
    Unauthenticated,
    /// An identity with the same normalized email already exists.
    DuplicateIdentity,
    /// The owner already has a saved topic with the same normalized title.
    DuplicateTitle,
    /// The record does not exist or is not owned by the caller.
    NotFound,
    /// The requested change is already in effect.
    Conflict,
    /// The caller's role is insufficient for the operation.
    Unauthorized,
    /// The CSRF check for a mutating request failed.
    CsrfRejected,
    /// The backing store failed or timed out.
    StoreUnavailable,
    /// An unexpected internal failure.
    Internal,
    /// Configuration could not be loaded or is invalid.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::DuplicateIdentity => write!(f, "DUPLICATE_IDENTITY"),
            Self::DuplicateTitle => write!(f, "DUPLICATE_TITLE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::CsrfRejected => write!(f, "CSRF_REJECTED"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout Brainery.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message, safe to show to the caller.
    pub message: String,
    /// The offending input field for validation failures.
    pub field: Option<String>,
    /// Operator-facing context. Logged, never returned to callers.
    pub detail: Option<String>,
    /// Optional underlying cause. Logged, never returned to callers.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            detail: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            detail: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error without a field.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a validation error tied to a specific input field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::validation(message)
        }
    }

    /// Create the generic login failure.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Create a duplicate-identity error.
    pub fn duplicate_identity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateIdentity, message)
    }

    /// Create a duplicate-title error.
    pub fn duplicate_title(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateTitle, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error for a change that would be a no-op.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an authorization (insufficient role) error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a CSRF rejection.
    pub fn csrf_rejected() -> Self {
        Self::new(ErrorKind::CsrfRejected, "CSRF token missing or invalid")
    }

    /// Wrap a backend failure. The caller sees a generic message; the
    /// description and cause go to the logs.
    pub fn store(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            detail: Some(context.into()),
            ..Self::with_source(ErrorKind::StoreUnavailable, STORE_UNAVAILABLE_MESSAGE, source)
        }
    }

    /// Create a store-unavailable error without an underlying cause.
    pub fn store_unavailable(context: impl Into<String>) -> Self {
        Self {
            detail: Some(context.into()),
            ..Self::new(ErrorKind::StoreUnavailable, STORE_UNAVAILABLE_MESSAGE)
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Operator-facing description, including the cause when present.
    pub fn log_detail(&self) -> String {
        let head = self.detail.as_deref().unwrap_or(&self.message);
        match &self.source {
            Some(source) => format!("{head}: {source}"),
            None => head.to_string(),
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            field: self.field.clone(),
            detail: self.detail.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_hides_driver_detail() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connection reset by peer");
        let err = AppError::store("Failed to find identity by email", io);
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert_eq!(err.message, STORE_UNAVAILABLE_MESSAGE);
        assert!(!err.to_string().contains("connection reset"));
        assert!(err.log_detail().contains("connection reset"));
    }

    #[test]
    fn test_invalid_field_carries_field() {
        let err = AppError::invalid_field("password", "Password is too short");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field.as_deref(), Some("password"));
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::store("ctx", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.kind, err.kind);
    }
}
