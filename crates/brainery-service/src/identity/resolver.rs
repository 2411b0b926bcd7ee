//! Identity resolver: the single path from credentials or a session token to
//! an [`Identity`].

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use brainery_auth::password::{PasswordHasher, PasswordValidator};
use brainery_auth::session::{IssuedSession, Notice, NoticeLevel, SessionManager, SessionRecord};
use brainery_core::error::{AppError, ErrorKind};
use brainery_core::types::IdentityId;
use brainery_database::CredentialStore;
use brainery_entity::identity::{Identity, NewIdentity, Role, normalize_email};

use super::registration::Registration;
use crate::context::RequestContext;

const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already registered. Try logging in instead.";

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated identity.
    pub identity: Identity,
    /// The session opened for it.
    pub issued: IssuedSession,
}

/// A session token resolved to the identity it names.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Context built from the identity as stored right now.
    pub context: RequestContext,
    /// Server-side session state.
    pub session: SessionRecord,
}

/// Resolves credentials and session tokens to identities.
#[derive(Clone)]
pub struct IdentityResolver {
    identities: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    sessions: Arc<SessionManager>,
}

impl IdentityResolver {
    /// Creates a new resolver.
    pub fn new(
        identities: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            identities,
            hasher,
            validator,
            sessions,
        }
    }

    /// Checks credentials without opening a session.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let normalized = normalize_email(email);
        if normalized.is_empty() || password.is_empty() {
            return Err(AppError::invalid_credentials());
        }

        let Some(identity) = self.identities.find_by_email(&normalized).await? else {
            info!("Login rejected");
            return Err(AppError::invalid_credentials());
        };

        if !self
            .hasher
            .verify_password(password, &identity.password_hash)
        {
            info!("Login rejected");
            return Err(AppError::invalid_credentials());
        }
        Ok(identity)
    }

    /// Checks credentials and opens a session whose landing follows the
    /// identity's current role.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome, AppError> {
        let identity = self.authenticate(email, password).await?;
        let issued = self.sessions.open(&identity, remember)?;

        let greeting = if identity.is_admin() {
            "Logged in as Admin!"
        } else {
            "Logged in successfully!"
        };
        self.sessions
            .registry()
            .push_notice(&issued.session.id, Notice::new(NoticeLevel::Success, greeting));

        Ok(LoginOutcome { identity, issued })
    }

    /// Resolves a session token. Every failure, including a store outage,
    /// yields `None`.
    pub async fn resolve_session(&self, token: &str) -> Option<ResolvedSession> {
        let (claims, session) = self.sessions.authenticate(token)?;
        let identity_id = claims.identity_id();

        let identity = match self.identities.find_by_id(&identity_id).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                info!(identity_id = %identity_id, "Session names a deleted identity");
                self.sessions.close(&session.id);
                return None;
            }
            Err(e) => {
                warn!(
                    identity_id = %identity_id,
                    error = %e.log_detail(),
                    "Session lookup failed"
                );
                return None;
            }
        };

        Some(ResolvedSession {
            context: RequestContext::new(&identity, session.id),
            session,
        })
    }

    /// Ends a session and discards its notices.
    pub fn logout(&self, session_id: &Uuid) -> bool {
        self.sessions.close(session_id)
    }

    /// Registers a new identity with the `user` role.
    pub async fn register(&self, form: &Registration) -> Result<Identity, AppError> {
        form.check_fields()?;
        self.validator.validate(&form.password)?;
        self.validator
            .validate_confirmation(&form.password, &form.confirm_password)?;

        let email = form.email.trim().to_string();
        if self.email_exists(&email).await? {
            return Err(AppError::duplicate_identity(DUPLICATE_EMAIL_MESSAGE));
        }

        let draft = NewIdentity {
            username: form.username(),
            email,
            password_hash: self.hasher.hash_password(&form.password)?,
            role: Role::User,
        };

        // The store's unique key settles races the check above cannot see.
        let identity = self.identities.create(&draft).await.map_err(|e| {
            if e.kind == ErrorKind::DuplicateIdentity {
                AppError::duplicate_identity(DUPLICATE_EMAIL_MESSAGE)
            } else {
                e
            }
        })?;

        info!(
            identity_id = %identity.id,
            plan = form.selected_plan.trim(),
            "Identity registered"
        );
        Ok(identity)
    }

    /// Whether an identity with this email (compared normalized) exists.
    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let normalized = normalize_email(email);
        if normalized.is_empty() {
            return Err(AppError::invalid_field("email", "Email field is required."));
        }
        Ok(self.identities.find_by_email(&normalized).await?.is_some())
    }

    /// Replaces the password of the identity registered under `email`.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AppError> {
        let normalized = normalize_email(email);
        if normalized.is_empty() || new_password.is_empty() {
            return Err(AppError::validation("Email and new password are required."));
        }
        self.validator.validate(new_password)?;

        let identity = self
            .identities
            .find_by_email(&normalized)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;

        self.set_password(&identity.id, new_password).await
    }

    /// Hashes and stores a new password for an identity.
    pub async fn set_password(&self, id: &IdentityId, new_password: &str) -> Result<(), AppError> {
        let hash = self.hasher.hash_password(new_password)?;
        if !self.identities.update_password(id, &hash).await? {
            return Err(AppError::not_found("User not found."));
        }
        info!(identity_id = %id, "Password updated");
        Ok(())
    }

    /// Drains the pending notices of a session.
    pub fn take_notices(&self, session_id: &Uuid) -> Vec<Notice> {
        self.sessions.registry().take_notices(session_id)
    }

    /// The session manager backing this resolver.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}
