//! Admin identity management: overview, promotion, deletion.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use brainery_auth::rbac::RbacEnforcer;
use brainery_auth::session::SessionManager;
use brainery_core::error::AppError;
use brainery_core::types::{IdentityId, Page, PageRequest};
use brainery_database::CredentialStore;
use brainery_entity::identity::{Identity, Role};

use crate::context::RequestContext;

/// Data behind the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    /// One page of identities, newest first.
    pub users: Page<Identity>,
    /// Number of registered identities.
    pub total_users: u64,
    /// Number of admins among them.
    pub admin_users: u64,
}

/// Handles administrative identity operations. Every method requires the
/// caller to be an admin right now.
#[derive(Clone)]
pub struct AdminService {
    identities: Arc<dyn CredentialStore>,
    rbac: Arc<RbacEnforcer>,
    sessions: Arc<SessionManager>,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        identities: Arc<dyn CredentialStore>,
        rbac: Arc<RbacEnforcer>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            identities,
            rbac,
            sessions,
        }
    }

    /// Identity listing plus headline counts.
    pub async fn overview(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<AdminOverview, AppError> {
        self.rbac.require_admin(ctx.role)?;

        let users = self.identities.list(&page).await?;
        let total_users = self.identities.count().await?;
        let admin_users = self.identities.count_by_role(Role::Admin).await?;
        Ok(AdminOverview {
            users,
            total_users,
            admin_users,
        })
    }

    /// Grants the admin role.
    ///
    /// Sessions already open keep the landing they were given at login.
    pub async fn promote(&self, ctx: &RequestContext, id: &IdentityId) -> Result<Identity, AppError> {
        self.rbac.require_admin(ctx.role)?;

        let mut identity = self
            .identities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if identity.is_admin() {
            return Err(AppError::conflict("User is already an admin"));
        }
        if !self.identities.update_role(id, Role::Admin).await? {
            return Err(AppError::not_found("User not found"));
        }

        info!(actor = %ctx.identity_id, identity_id = %id, "Identity promoted to admin");
        identity.role = Role::Admin;
        Ok(identity)
    }

    /// Deletes an identity, its owned records, and its live sessions.
    pub async fn delete_identity(&self, ctx: &RequestContext, id: &IdentityId) -> Result<(), AppError> {
        self.rbac.require_admin(ctx.role)?;

        if !self.identities.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }
        let revoked = self.sessions.registry().revoke_identity(id);

        info!(
            actor = %ctx.identity_id,
            identity_id = %id,
            sessions_revoked = revoked,
            "Identity deleted"
        );
        Ok(())
    }
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish_non_exhaustive()
    }
}
