//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

/// Login request body.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address, any casing.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Ask for the long-lived session.
    #[serde(default)]
    pub remember: bool,
}

/// Password reset request body.
#[derive(Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and new password are required."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and new password are required."))]
    pub new_password: String,
}

/// Email availability check body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckEmailRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email field is required."))]
    pub email: String,
}

/// Save topic request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveTopicRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Summary is too long"))]
    pub summary: Option<String>,
}

/// Rename topic request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameTopicRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Title is too long"))]
    pub new_title: String,
}

/// Resource create body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResourceRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 2048, message = "Link is too long"))]
    pub link: Option<String>,
    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,
}

/// Resource update body. Absent fields are left alone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 2048, message = "Link is too long"))]
    pub link: Option<String>,
    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,
}
