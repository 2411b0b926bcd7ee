//! Password strength policy for registration and resets.

use brainery_core::config::AuthConfig;
use brainery_core::error::AppError;

const FIELD: &str = "password";

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
    /// Characters that satisfy the symbol requirement.
    special_chars: String,
    /// Optional zxcvbn score floor (0-4).
    min_score: Option<u8>,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            special_chars: config.password_special_chars.clone(),
            min_score: config.password_min_score,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation found, tied to the `password` field.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::invalid_field(
                FIELD,
                format!(
                    "Password must be at least {} characters long",
                    self.min_length
                ),
            ));
        }

        if !password.chars().any(char::is_uppercase) {
            return Err(AppError::invalid_field(
                FIELD,
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid_field(
                FIELD,
                "Password must contain at least one number",
            ));
        }

        if !password.chars().any(|c| self.special_chars.contains(c)) {
            return Err(AppError::invalid_field(
                FIELD,
                format!(
                    "Password must contain at least one special character ({})",
                    self.special_chars
                ),
            ));
        }

        if let Some(floor) = self.min_score {
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if u8::from(estimate.score()) < floor {
                return Err(AppError::invalid_field(
                    FIELD,
                    "Password is too easy to guess. Please choose a stronger one.",
                ));
            }
        }

        Ok(())
    }

    /// Validates that the confirmation matches the password.
    pub fn validate_confirmation(&self, password: &str, confirmation: &str) -> Result<(), AppError> {
        if password != confirmation {
            return Err(AppError::invalid_field(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        Ok(())
    }
}
