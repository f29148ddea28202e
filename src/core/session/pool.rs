use crate::core::session::session::{SessionEntry, SessionId};
use crate::domain::error::{SwarmError, SwarmResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Bounded set of live sessions
///
/// `reserve` is the only insert path and performs its capacity check and the
/// insert under a single write guard, so `len <= capacity` holds at all
/// times. `release` is idempotent: an id already removed yields `None`.
#[derive(Clone)]
pub struct SessionPool {
    entries: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    capacity: usize,
}

impl SessionPool {
    /// Create an empty pool with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Reserve a slot for a new session
    ///
    /// Fails with `PoolFull` when the pool is at capacity, and with a
    /// session error if the id is already present.
    pub async fn reserve(&self, id: SessionId, entry: SessionEntry) -> SwarmResult<()> {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.capacity {
            return Err(SwarmError::PoolFull {
                capacity: self.capacity,
            });
        }

        if entries.contains_key(&id) {
            return Err(SwarmError::Session {
                message: format!("Session '{}' is already tracked", id),
            });
        }

        debug!("Reserved slot for session '{}' ({})", id, entry.identity);
        entries.insert(id, entry);
        Ok(())
    }

    /// Remove a session, returning its entry at most once
    pub async fn release(&self, id: &SessionId) -> Option<SessionEntry> {
        let mut entries = self.entries.write().await;
        let removed = entries.remove(id);
        if removed.is_some() {
            debug!("Released session '{}'", id);
        }
        removed
    }

    /// Remove every session, returning the drained entries
    pub async fn drain(&self) -> Vec<SessionEntry> {
        let mut entries = self.entries.write().await;
        entries.drain().map(|(_, entry)| entry).collect()
    }

    /// Apply a mutation to one tracked session
    ///
    /// Returns the closure result, or `None` if the id is not tracked.
    pub async fn with_entry<F, R>(&self, id: &SessionId, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionEntry) -> R,
    {
        let mut entries = self.entries.write().await;
        entries.get_mut(id).map(f)
    }

    /// Ids of all tracked sessions
    pub async fn snapshot_ids(&self) -> Vec<SessionId> {
        let entries = self.entries.read().await;
        entries.keys().cloned().collect()
    }

    /// Current number of tracked sessions
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Configured maximum number of sessions
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
