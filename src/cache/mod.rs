//! Cache Module
//!
//! Bounded in-memory web object cache with an age-based (semi-LRU) eviction policy.

mod entry;
mod eviction;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, EntryId};
pub use eviction::eldest_index;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::{CacheSnapshot, CacheStore, LineSnapshot};

// == Public Constants ==
/// Total cache capacity in bytes, also the bound on a relayed response
pub const MAX_CACHE_SIZE: usize = 1_049_000;

/// Largest response eligible for caching, in bytes
pub const MAX_OBJECT_SIZE: usize = 102_400;
