//! Short-lived pending-memory entries awaiting user confirmation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

struct PendingEntry {
    summary: String,
    /// Generation token of the write that armed the expiry. An expiry
    /// task only evicts the exact write it was armed for, so an older
    /// timer can never remove a newer entry.
    token: u64,
}

/// Session-keyed store of proposed memory summaries with bounded lifetime.
///
/// At most one entry per session; a new `store` overwrites the old entry
/// and re-arms its expiry. `store` must be called within a Tokio runtime.
pub struct PendingMemoryStore {
    entries: Arc<Mutex<HashMap<String, PendingEntry>>>,
    ttl: Duration,
    seq: AtomicU64,
}

impl PendingMemoryStore {
    /// Create a store whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            seq: AtomicU64::new(0),
        }
    }

    /// Store a proposed summary for the session, overwriting any previous
    /// entry and scheduling automatic expiry.
    pub fn store(&self, session_id: &str, summary: &str) {
        let token = self.seq.fetch_add(1, Ordering::Relaxed);
        {
            let mut entries = self.entries.lock().unwrap();
            entries.insert(
                session_id.to_string(),
                PendingEntry {
                    summary: summary.to_string(),
                    token,
                },
            );
        }
        debug!(session_id, token, "pending memory stored");

        let entries = Arc::clone(&self.entries);
        let session = session_id.to_string();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut entries = entries.lock().unwrap();
            if entries.get(&session).is_some_and(|e| e.token == token) {
                entries.remove(&session);
                debug!(session_id = %session, token, "pending memory expired");
            }
        });
    }

    /// Atomically remove and return the session's entry, if present.
    pub fn pop(&self, session_id: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .remove(session_id)
            .map(|e| e.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_then_pop() {
        let store = PendingMemoryStore::new(Duration::from_secs(60));
        store.store("s1", "散歩が楽しかった");
        assert_eq!(store.pop("s1"), Some("散歩が楽しかった".to_string()));
        assert_eq!(store.pop("s1"), None);
    }

    #[tokio::test]
    async fn test_entries_are_session_scoped() {
        let store = PendingMemoryStore::new(Duration::from_secs(60));
        store.store("s1", "a");
        store.store("s2", "b");
        assert_eq!(store.pop("s2"), Some("b".to_string()));
        assert_eq!(store.pop("s1"), Some("a".to_string()));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_summary() {
        let store = PendingMemoryStore::new(Duration::from_secs(60));
        store.store("s1", "old");
        store.store("s1", "new");
        assert_eq!(store.pop("s1"), Some("new".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = PendingMemoryStore::new(Duration::from_secs(60));
        store.store("s1", "a");
        // Let the expiry task register its timer before advancing the clock.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(61)).await;
        // Let the expiry task run.
        tokio::task::yield_now().await;
        assert_eq!(store.pop("s1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_evict_newer_entry() {
        let store = PendingMemoryStore::new(Duration::from_secs(60));
        store.store("s1", "old");
        tokio::time::advance(Duration::from_secs(30)).await;

        // Re-arm with a newer write; the first timer fires 30s later.
        store.store("s1", "new");
        tokio::time::advance(Duration::from_secs(40)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.pop("s1"), Some("new".to_string()));
    }
}
