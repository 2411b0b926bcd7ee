//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use brainery_auth::password::{PasswordHasher, PasswordValidator};
use brainery_auth::rbac::RbacEnforcer;
use brainery_auth::session::SessionManager;
use brainery_core::config::AppConfig;
use brainery_database::StoreSet;
use brainery_service::{
    AdminService, CatalogService, IdentityResolver, ResourceService, SavedTopicService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Stores of the configured backend
    pub stores: StoreSet,

    // ── Auth ─────────────────────────────────────────────────
    /// Session lifecycle manager
    pub sessions: Arc<SessionManager>,

    // ── Services ─────────────────────────────────────────────
    /// Login, session resolution, registration
    pub resolver: Arc<IdentityResolver>,
    /// Admin identity management
    pub admin_service: Arc<AdminService>,
    /// Saved topics
    pub saved_topic_service: Arc<SavedTopicService>,
    /// Resources
    pub resource_service: Arc<ResourceService>,
    /// Catalog browsing
    pub catalog_service: Arc<CatalogService>,
}

impl AppState {
    /// Wires every service over the given stores.
    pub fn new(config: AppConfig, stores: StoreSet) -> Self {
        let sessions = Arc::new(SessionManager::new(&config.auth, &config.session));
        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&config.auth));
        let rbac = Arc::new(RbacEnforcer::new());

        let resolver = Arc::new(IdentityResolver::new(
            Arc::clone(&stores.identities),
            hasher,
            validator,
            Arc::clone(&sessions),
        ));
        let admin_service = Arc::new(AdminService::new(
            Arc::clone(&stores.identities),
            rbac,
            Arc::clone(&sessions),
        ));
        let saved_topic_service = Arc::new(SavedTopicService::new(
            Arc::clone(&stores.saved_topics),
            Arc::clone(&stores.catalog),
        ));
        let resource_service = Arc::new(ResourceService::new(Arc::clone(&stores.resources)));
        let catalog_service = Arc::new(CatalogService::new(Arc::clone(&stores.catalog)));

        Self {
            config: Arc::new(config),
            stores,
            sessions,
            resolver,
            admin_service,
            saved_topic_service,
            resource_service,
            catalog_service,
        }
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}
