//! Cache Store Module
//!
//! Main cache engine: an owned collection of cache lines bounded by total byte size.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{eldest_index, CacheEntry, CacheStats, EntryId, MAX_CACHE_SIZE, MAX_OBJECT_SIZE};
use crate::error::{ProxyError, Result};

// == Cache Store ==
/// Byte-bounded web object cache with semi-LRU eviction.
///
/// Entries are kept front to back in insertion order (newest first). The
/// store does not enforce key uniqueness; callers check with
/// [`CacheStore::contains`] before inserting.
#[derive(Debug)]
pub struct CacheStore {
    /// Cache lines, newest at the front
    entries: VecDeque<CacheEntry>,
    /// Sum of all entry sizes
    total_size: usize,
    /// Total byte capacity
    capacity: usize,
    /// Per-object cap used to decide when the cache is full
    max_object_size: usize,
    /// Next handle to issue
    next_id: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(MAX_CACHE_SIZE, MAX_OBJECT_SIZE)
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Total byte capacity
    /// * `max_object_size` - Largest object the cache is meant to hold
    pub fn new(capacity: usize, max_object_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            total_size: 0,
            capacity,
            max_object_size,
            next_id: 0,
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Probes the cache for `key`.
    ///
    /// Every probe of a non-empty cache ages every entry by one, whether or
    /// not the key is found. An empty cache is left untouched, statistics
    /// included.
    pub fn lookup(&mut self, key: &str) -> Option<&CacheEntry> {
        if self.entries.is_empty() {
            return None;
        }

        for entry in self.entries.iter_mut() {
            entry.grow_older();
        }

        match self.entries.iter().position(|entry| entry.key == key) {
            Some(idx) => {
                self.stats.record_hit();
                self.entries.get(idx)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Contains ==
    /// Checks for `key` without aging anything.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    // == Insert ==
    /// Adds a new entry at the front of the cache.
    ///
    /// If the cache is full, exactly one entry is evicted first. A single
    /// eviction may not free enough room for a large object; no further
    /// entries are evicted.
    ///
    /// # Arguments
    /// * `key` - Cache key (`host + path`)
    /// * `payload` - Response bytes; callers keep it within `max_object_size`
    pub fn insert(&mut self, key: String, payload: impl Into<Arc<[u8]>>) -> EntryId {
        if self.is_full() {
            let _ = self.evict();
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;

        let entry = CacheEntry::new(id, key, payload);
        self.total_size += entry.size;
        self.entries.push_front(entry);

        self.stats.record_insertion();
        self.sync_occupancy();
        id
    }

    // == Evict ==
    /// Removes and returns the entry with the greatest age.
    ///
    /// Returns None on an empty cache.
    pub fn evict(&mut self) -> Option<CacheEntry> {
        let idx = eldest_index(&self.entries)?;
        let id = self.entries[idx].id;
        let evicted = self.remove(id).ok()?;
        self.stats.record_eviction();
        Some(evicted)
    }

    // == Remove ==
    /// Removes a specific entry by handle.
    pub fn remove(&mut self, id: EntryId) -> Result<CacheEntry> {
        let idx = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| ProxyError::Cache(format!("remove: entry {} not found", id)))?;

        let entry = self
            .entries
            .remove(idx)
            .ok_or_else(|| ProxyError::Cache(format!("remove: entry {} vanished", id)))?;
        self.total_size -= entry.size;
        self.sync_occupancy();
        Ok(entry)
    }

    // == Destroy ==
    /// Drops every entry and returns to the empty state.
    pub fn destroy(&mut self) {
        self.entries.clear();
        self.total_size = 0;
        self.sync_occupancy();
    }

    // == Is Full ==
    /// True when there is no room left for a maximum-size object.
    pub fn is_full(&self) -> bool {
        self.capacity.saturating_sub(self.total_size) < self.max_object_size
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries front (newest) to back.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Snapshot ==
    /// Returns a serializable view of every cache line.
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            total_size: self.total_size,
            capacity: self.capacity,
            lines: self
                .entries
                .iter()
                .map(|entry| LineSnapshot {
                    key: entry.key.clone(),
                    size: entry.size,
                    age: entry.age,
                    created_at: entry.created_at,
                })
                .collect(),
        }
    }

    fn sync_occupancy(&mut self) {
        self.stats.set_occupancy(self.entries.len(), self.total_size);
    }
}

// == Snapshot Types ==
/// Point-in-time description of the cache, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub total_size: usize,
    pub capacity: usize,
    /// Lines front (newest) to back
    pub lines: Vec<LineSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineSnapshot {
    pub key: String,
    pub size: usize,
    pub age: u64,
    pub created_at: DateTime<Utc>,
}
