//! Cache Stats Report Task
//!
//! Background task that periodically logs cache occupancy and hit rate.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that logs cache statistics every interval.
///
/// The task only takes the cache's read lock, so it never delays a probe
/// for longer than a statistics copy.
///
/// # Arguments
/// * `cache` - Shared handle to the proxy cache
/// * `interval_secs` - Seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::new();
/// let stats_handle = spawn_stats_task(cache.clone(), 60);
/// // Later, during shutdown:
/// stats_handle.abort();
/// ```
pub fn spawn_stats_task(cache: SharedCache, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!("Starting cache stats task with interval of {} seconds", interval_secs);

        let mut last_lookups = 0;
        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.stats().await;
            let lookups = stats.hits + stats.misses;

            if lookups == last_lookups {
                debug!("Cache stats: idle, {} entries", stats.total_entries);
                continue;
            }
            last_lookups = lookups;

            info!(
                entries = stats.total_entries,
                bytes = stats.total_size,
                hits = stats.hits,
                misses = stats.misses,
                evictions = stats.evictions,
                "Cache stats: hit rate {:.1}%",
                stats.hit_rate() * 100.0
            );
        }
    })
}
