//! Cache Entry Module
//!
//! Defines a single cached web object (a cache line) and its bookkeeping.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

// == Entry Id ==
/// Stable handle identifying one entry for the lifetime of the cache.
///
/// Ids are never reused, so removing by id can only ever hit the entry
/// it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// == Cache Entry ==
/// One cached origin response keyed by `host + path`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Handle assigned by the owning store
    pub id: EntryId,
    /// Concatenation of host and path, no delimiter
    pub key: String,
    /// Exact bytes returned to a client on a hit
    pub payload: Arc<[u8]>,
    /// Byte length of `payload`
    pub size: usize,
    /// Eviction rank; grows by one on every probe of the cache
    pub age: u64,
    /// Creation timestamp, diagnostics only
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry with age zero.
    ///
    /// # Arguments
    /// * `id` - Handle issued by the store
    /// * `key` - Cache key (`host + path`)
    /// * `payload` - Full response bytes
    pub fn new(id: EntryId, key: String, payload: impl Into<Arc<[u8]>>) -> Self {
        let payload = payload.into();
        Self {
            id,
            key,
            size: payload.len(),
            payload,
            age: 0,
            created_at: Utc::now(),
        }
    }

    // == Aging ==
    /// Bumps the age by one probe.
    pub fn grow_older(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Builds the cache key for a resource.
    pub fn make_key(host: &str, path: &str) -> String {
        let mut key = String::with_capacity(host.len() + path.len());
        key.push_str(host);
        key.push_str(path);
        key
    }
}
