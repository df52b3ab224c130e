//! Shared Cache Module
//!
//! Process-wide handle to the object cache. The handle owns its lock, so a
//! single instance created at startup is cloned into every connection handler.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheSnapshot, CacheStats, CacheStore, EntryId};

// == Shared Cache ==
/// Cloneable, thread-safe handle to one [`CacheStore`].
///
/// Lookups age every entry, so they take the write lock just like inserts and
/// evictions. Readers therefore never observe a half-applied mutation and
/// concurrent probes never race on the age counters. Only pure reads
/// (statistics, snapshots) share the read lock.
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<RwLock<CacheStore>>,
    /// Copies of the store's fixed limits, readable without locking
    capacity: usize,
    max_object_size: usize,
}

impl Default for SharedCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedCache {
    /// Creates a handle with the fixed production limits.
    pub fn new() -> Self {
        Self::from_store(CacheStore::default())
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore) -> Self {
        Self {
            capacity: store.capacity(),
            max_object_size: store.max_object_size(),
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Total byte capacity of the underlying store.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest payload the relay may store.
    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    // == Lookup ==
    /// Probes the cache and returns the cached payload on a hit.
    pub async fn lookup(&self, key: &str) -> Option<Arc<[u8]>> {
        // Write lock: a probe ages every entry
        let mut store = self.inner.write().await;
        store.lookup(key).map(|entry| Arc::clone(&entry.payload))
    }

    // == Insert If Absent ==
    /// Inserts `payload` under `key` unless another handler cached it first.
    ///
    /// The duplicate check and the insert run under the same write lock.
    /// Returns true if the entry was added.
    pub async fn insert_if_absent(&self, key: String, payload: impl Into<Arc<[u8]>>) -> bool {
        let mut store = self.inner.write().await;
        if store.contains(&key) {
            debug!(key = %key, "Already cached, skipping insert");
            return false;
        }
        let id = store.insert(key, payload);
        debug!(entry = %id, total_size = store.total_size(), "Cached object");
        true
    }

    // == Remove ==
    /// Removes an entry by handle. A missing entry is logged and ignored.
    pub async fn remove(&self, id: EntryId) {
        let mut store = self.inner.write().await;
        if let Err(e) = store.remove(id) {
            warn!("{}", e);
        }
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn snapshot(&self) -> CacheSnapshot {
        self.inner.read().await.snapshot()
    }

    // == Destroy ==
    /// Releases every entry; called once at shutdown.
    pub async fn destroy(&self) {
        self.inner.write().await.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn small_cache() -> SharedCache {
        SharedCache::from_store(CacheStore::new(1000, 100))
    }

    #[test]
    fn test_limits_copied_from_store() {
        let cache = small_cache();
        assert_eq!(cache.capacity(), 1000);
        assert_eq!(cache.max_object_size(), 100);
    }

    #[tokio::test]
    async fn test_lookup_miss_then_hit() {
        let cache = small_cache();
        assert!(cache.lookup("example.com/").await.is_none());

        assert!(cache.insert_if_absent("example.com/".to_string(), b"body".to_vec()).await);
        let payload = cache.lookup("example.com/").await.unwrap();
        assert_eq!(&payload[..], b"body");
    }

    #[tokio::test]
    async fn test_insert_if_absent_skips_duplicates() {
        let cache = small_cache();
        assert!(cache.insert_if_absent("k".to_string(), b"one".to_vec()).await);
        assert!(!cache.insert_if_absent("k".to_string(), b"two".to_vec()).await);

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(&cache.lookup("k").await.unwrap()[..], b"one");
    }

    #[tokio::test]
    async fn test_remove_missing_is_no_op() {
        let cache = small_cache();
        cache.insert_if_absent("k".to_string(), b"abc".to_vec()).await;
        cache.remove(EntryId(99)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_size, 3);
    }

    #[tokio::test]
    async fn test_destroy_empties_cache() {
        let cache = small_cache();
        cache.insert_if_absent("k".to_string(), b"abc".to_vec()).await;
        cache.destroy().await;
        assert_eq!(cache.snapshot().await.lines.len(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_age_consistently() {
        let cache = small_cache();
        cache.insert_if_absent("k".to_string(), b"v".to_vec()).await;

        let mut handles = Vec::new();
        for i in 0..50 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = if i % 2 == 0 { "k" } else { "other" };
                cache.lookup(key).await
            }));
        }
        for handle in handles {
            assert_ok!(handle.await);
        }

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.lines[0].age, 50);
        let stats = cache.stats().await;
        assert_eq!(stats.hits + stats.misses, 50);
    }
}
