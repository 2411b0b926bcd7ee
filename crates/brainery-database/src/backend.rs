//! Backend selection.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use brainery_core::config::{DatabaseConfig, StoreBackend};
use brainery_core::result::AppResult;

use crate::document::{
    CatalogDocuments, DocumentDatabase, IdentityDocuments, ResourceDocuments, SavedTopicDocuments,
};
use crate::relational::{
    CatalogRepository, DatabasePool, IdentityRepository, ResourceRepository, SavedTopicRepository,
    run_migrations,
};
use crate::store::{CatalogStore, CredentialStore, ResourceStore, SavedTopicStore, StoreHealth};

/// Every store the application needs, all backed by the same backend.
#[derive(Clone)]
pub struct StoreSet {
    /// Which backend is in use.
    pub backend: StoreBackend,
    /// Identities.
    pub identities: Arc<dyn CredentialStore>,
    /// Saved topics.
    pub saved_topics: Arc<dyn SavedTopicStore>,
    /// Resources.
    pub resources: Arc<dyn ResourceStore>,
    /// Shared catalog.
    pub catalog: Arc<dyn CatalogStore>,
    /// Connectivity and shutdown.
    pub health: Arc<dyn StoreHealth>,
}

impl StoreSet {
    /// Open the configured backend, running migrations or loading the
    /// snapshot as appropriate.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        info!(backend = %config.backend, "Opening store backend");
        match config.backend {
            StoreBackend::Relational => {
                let pool = DatabasePool::connect(config).await?;
                run_migrations(pool.pool()).await?;
                Ok(Self::relational(pool))
            }
            StoreBackend::Document => {
                let db = match &config.document_path {
                    Some(path) => {
                        let db = DocumentDatabase::open(path).await?;
                        db.spawn_flusher(Duration::from_secs(config.flush_interval_seconds.max(1)));
                        db
                    }
                    None => DocumentDatabase::in_memory(),
                };
                Ok(Self::document(db))
            }
        }
    }

    /// Stores over an already connected and migrated SQLite pool.
    pub fn relational(pool: DatabasePool) -> Self {
        let sqlite = pool.pool().clone();
        Self {
            backend: StoreBackend::Relational,
            identities: Arc::new(IdentityRepository::new(sqlite.clone())),
            saved_topics: Arc::new(SavedTopicRepository::new(sqlite.clone())),
            resources: Arc::new(ResourceRepository::new(sqlite.clone())),
            catalog: Arc::new(CatalogRepository::new(sqlite)),
            health: Arc::new(pool),
        }
    }

    /// Stores over a document database.
    pub fn document(db: Arc<DocumentDatabase>) -> Self {
        Self {
            backend: StoreBackend::Document,
            identities: Arc::new(IdentityDocuments::new(Arc::clone(&db))),
            saved_topics: Arc::new(SavedTopicDocuments::new(Arc::clone(&db))),
            resources: Arc::new(ResourceDocuments::new(Arc::clone(&db))),
            catalog: Arc::new(CatalogDocuments::new(Arc::clone(&db))),
            health: db,
        }
    }

    /// A fresh, empty, in-process instance of the given backend.
    pub async fn in_memory(backend: StoreBackend) -> AppResult<Self> {
        match backend {
            StoreBackend::Relational => {
                let pool = DatabasePool::in_memory().await?;
                run_migrations(pool.pool()).await?;
                Ok(Self::relational(pool))
            }
            StoreBackend::Document => Ok(Self::document(DocumentDatabase::in_memory())),
        }
    }
}

impl std::fmt::Debug for StoreSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSet")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
