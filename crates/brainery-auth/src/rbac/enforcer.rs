//! Admin gate.

use brainery_core::error::AppError;
use brainery_entity::identity::Role;

/// Enforces role requirements for administrative operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Succeeds only for admins.
    pub fn require_admin(&self, role: Role) -> Result<(), AppError> {
        if role.is_admin() {
            Ok(())
        } else {
            Err(AppError::unauthorized("Unauthorized access!"))
        }
    }

    /// Returns whether the role is an admin.
    pub fn is_admin(&self, role: Role) -> bool {
        role.is_admin()
    }
}
