//! Registration input and its field checks.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use brainery_core::error::AppError;

/// Field names in the order their errors are reported.
const FIELD_ORDER: [&str; 6] = [
    "first_name",
    "last_name",
    "email",
    "password",
    "confirm_password",
    "selected_plan",
];

/// Sign-up data as submitted by the client.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct Registration {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom(function = "email_field"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Please confirm your password"))]
    pub confirm_password: String,
    #[serde(default)]
    #[validate(custom(
        function = "not_blank",
        message = "Please select a plan before registering."
    ))]
    pub selected_plan: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn email_field(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::new("required").with_message(Cow::Borrowed("Email is required")))
    } else if !value.validate_email() {
        Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email address")))
    } else {
        Ok(())
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("selected_plan", &self.selected_plan)
            .finish_non_exhaustive()
    }
}

impl Registration {
    /// Display name stored on the identity.
    pub fn username(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Runs the field rules and reports the first failing field in form order.
    ///
    /// Password strength and confirmation are the password policy's job.
    pub fn check_fields(&self) -> Result<(), AppError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let failures = errors.field_errors();
        let first = FIELD_ORDER
            .iter()
            .find_map(|field| failures.get(*field).map(|list| (*field, list)));
        match first {
            Some((field, list)) => {
                let message = list
                    .first()
                    .and_then(|f| f.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                Err(AppError::invalid_field(field, message))
            }
            None => Err(AppError::validation("Invalid registration")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Registration {
        Registration {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            email: "A@Test.com".into(),
            password: "Abc123!".into(),
            confirm_password: "Abc123!".into(),
            selected_plan: "free".into(),
        }
    }

    #[test]
    fn test_complete_registration_passes() {
        let form = complete();
        assert!(form.check_fields().is_ok());
        assert_eq!(form.username(), "Ada Lovelace");
    }

    #[test]
    fn test_missing_plan_names_field() {
        let form = Registration {
            selected_plan: "  ".into(),
            ..complete()
        };
        let err = form.check_fields().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("selected_plan"));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let form = Registration {
            email: "not-an-email".into(),
            ..complete()
        };
        let err = form.check_fields().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("email"));
        assert_eq!(err.message, "Invalid email address");
    }

    #[test]
    fn test_errors_follow_form_order() {
        let form = Registration {
            first_name: String::new(),
            email: String::new(),
            ..complete()
        };
        let err = form.check_fields().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("first_name"));
    }

    #[test]
    fn test_padded_email_passes() {
        let form = Registration {
            email: "  ada@test.com ".into(),
            ..complete()
        };
        assert!(form.check_fields().is_ok());
    }
}
