//! Expired session cleanup.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::registry::SessionRegistry;

/// Periodically removes expired sessions from the registry.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    registry: Arc<SessionRegistry>,
}

impl SessionCleanup {
    /// Creates a cleanup handler for the registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Runs one cleanup cycle. Returns the number of sessions removed.
    pub fn run_cleanup(&self) -> usize {
        let removed = self.registry.purge_expired();
        if removed > 0 {
            info!(removed, remaining = self.registry.len(), "Session cleanup completed");
        } else {
            debug!("Session cleanup found nothing to remove");
        }
        removed
    }

    /// Runs cleanup on a fixed interval until the task is aborted.
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.run_cleanup();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainery_core::config::SessionConfig;
    use brainery_core::types::IdentityId;
    use brainery_entity::identity::Role;

    #[tokio::test(start_paused = true)]
    async fn test_spawned_cleanup_purges_expired() {
        let config = SessionConfig {
            ttl_minutes: 0,
            ..SessionConfig::default()
        };
        let registry = Arc::new(SessionRegistry::new(&config));
        registry.open(IdentityId::from(1), Role::User, false);
        assert_eq!(registry.len(), 1);

        let handle = SessionCleanup::new(Arc::clone(&registry)).spawn(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;
        assert!(registry.is_empty());
        handle.abort();
    }
}
