//! The set of document collections plus optional snapshot persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use brainery_core::error::AppError;
use brainery_core::result::AppResult;

use super::engine::{Collection, Document};
use crate::store::StoreHealth;

pub(crate) const USERS: &str = "users";
pub(crate) const SUBJECTS: &str = "subjects";
pub(crate) const TOPICS: &str = "topics";
pub(crate) const SAVED_TOPICS: &str = "saved_topics";
pub(crate) const RESOURCES: &str = "resources";

/// All collections of the document backend.
#[derive(Debug)]
pub struct DocumentDatabase {
    pub(crate) users: Arc<Collection>,
    pub(crate) subjects: Arc<Collection>,
    pub(crate) topics: Arc<Collection>,
    pub(crate) saved_topics: Arc<Collection>,
    pub(crate) resources: Arc<Collection>,
    /// Shared while owned records are inserted, exclusive while an identity
    /// and its records are deleted.
    owners: RwLock<()>,
    snapshot_path: Option<PathBuf>,
    flush_lock: tokio::sync::Mutex<()>,
    closed: AtomicBool,
}

impl DocumentDatabase {
    fn empty(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            users: Arc::new(
                Collection::new(USERS).with_unique_index("users_email_normalized", &["email_normalized"]),
            ),
            subjects: Arc::new(Collection::new(SUBJECTS).with_unique_index("subjects_name", &["name"])),
            topics: Arc::new(
                Collection::new(TOPICS).with_unique_index("topics_subject_title", &["subject_id", "title"]),
            ),
            saved_topics: Arc::new(
                Collection::new(SAVED_TOPICS)
                    .with_unique_index("saved_topics_user_title", &["user_id", "title_key"]),
            ),
            resources: Arc::new(Collection::new(RESOURCES)),
            owners: RwLock::new(()),
            snapshot_path,
            flush_lock: tokio::sync::Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// A database that lives only in this process.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self::empty(None))
    }

    /// Open a database backed by a snapshot file, loading it if present.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Arc<Self>> {
        let path = path.into();
        let db = Self::empty(Some(path.clone()));

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: HashMap<String, Vec<Document>> = serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::store(format!("Corrupt snapshot {}", path.display()), e))?;
                let mut loaded = 0usize;
                for collection in db.collections() {
                    for doc in snapshot.get(collection.name()).into_iter().flatten() {
                        collection.insert_one(doc.clone()).map_err(|e| {
                            AppError::store(format!("Corrupt snapshot {}", path.display()), e)
                        })?;
                        loaded += 1;
                    }
                    collection.take_dirty();
                }
                info!(path = %path.display(), documents = loaded, "Document snapshot loaded");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No document snapshot yet, starting empty");
            }
            Err(e) => {
                return Err(AppError::store(
                    format!("Failed to read snapshot {}", path.display()),
                    e,
                ));
            }
        }

        Ok(Arc::new(db))
    }

    /// Holds off identity deletion while a record for `owner` is inserted.
    ///
    /// Fails with `NotFound` when the owner no longer exists.
    pub(crate) fn lock_owner(&self, owner: &str) -> AppResult<RwLockReadGuard<'_, ()>> {
        let guard = self
            .owners
            .read()
            .map_err(|_| AppError::internal("Owner lock poisoned"))?;
        if self.users.find_by_id(owner).is_none() {
            return Err(AppError::not_found("Owner not found"));
        }
        Ok(guard)
    }

    /// Excludes record inserts for the duration of an identity cascade.
    pub(crate) fn lock_owners_exclusive(&self) -> AppResult<RwLockWriteGuard<'_, ()>> {
        self.owners
            .write()
            .map_err(|_| AppError::internal("Owner lock poisoned"))
    }

    fn collections(&self) -> [&Arc<Collection>; 5] {
        [
            &self.users,
            &self.subjects,
            &self.topics,
            &self.saved_topics,
            &self.resources,
        ]
    }

    /// Write the snapshot if any collection changed since the last flush.
    pub async fn flush(&self) -> AppResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let _guard = self.flush_lock.lock().await;

        let mut changed = false;
        for collection in self.collections() {
            changed |= collection.take_dirty();
        }
        if !changed {
            return Ok(());
        }

        let snapshot: HashMap<&str, Vec<Document>> = self
            .collections()
            .into_iter()
            .map(|c| (c.name(), c.dump()))
            .collect();

        if let Err(e) = write_snapshot(path, &snapshot).await {
            for collection in self.collections() {
                collection.mark_dirty();
            }
            return Err(e);
        }
        debug!(path = %path.display(), "Document snapshot written");
        Ok(())
    }

    /// Flush periodically until the database is closed or dropped.
    pub fn spawn_flusher(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(db) = weak.upgrade() else {
                    break;
                };
                if db.closed.load(Ordering::Acquire) {
                    break;
                }
                if let Err(e) = db.flush().await {
                    error!(error = %e.log_detail(), "Periodic snapshot flush failed");
                }
            }
            debug!("Document flusher stopped");
        })
    }
}

async fn write_snapshot(path: &Path, snapshot: &HashMap<&str, Vec<Document>>) -> AppResult<()> {
    let bytes = serde_json::to_vec(snapshot)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::store("Failed to create snapshot directory", e))?;
        }
    }

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| AppError::store(format!("Failed to write {}", tmp.display()), e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| AppError::store(format!("Failed to replace {}", path.display()), e))?;
    Ok(())
}

#[async_trait]
impl StoreHealth for DocumentDatabase {
    async fn ping(&self) -> AppResult<()> {
        match self.collections().into_iter().find(|c| !c.is_healthy()) {
            Some(broken) => Err(AppError::store_unavailable(format!(
                "Collection '{}' is poisoned",
                broken.name()
            ))),
            None => Ok(()),
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Err(e) = self.flush().await {
            warn!(error = %e.log_detail(), "Final snapshot flush failed");
        }
        info!("Document database closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::codec::object;
    use crate::document::engine::Filter;
    use serde_json::json;

    fn temp_snapshot() -> PathBuf {
        std::env::temp_dir().join(format!("brainery-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_rebuilds_indexes() {
        let path = temp_snapshot();
        let db = DocumentDatabase::open(&path).await.unwrap();
        db.users
            .insert_one(object(json!({"email_normalized": "a@x.io", "username": "A"})))
            .unwrap();
        db.close().await;

        let reopened = DocumentDatabase::open(&path).await.unwrap();
        assert_eq!(reopened.users.count(&Filter::all()), 1);
        assert!(
            reopened
                .users
                .insert_one(object(json!({"email_normalized": "a@x.io"})))
                .is_err()
        );

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_in_memory_flush_is_noop() {
        let db = DocumentDatabase::in_memory();
        db.users.insert_one(object(json!({"email_normalized": "a@x.io"}))).unwrap();
        db.flush().await.unwrap();
        db.ping().await.unwrap();
    }
}
