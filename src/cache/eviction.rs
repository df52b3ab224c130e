//! Eviction Module
//!
//! Victim selection for the semi-LRU policy.
//!
//! Ages start at zero when an entry is created and every probe of the cache
//! (hit or miss) ages every entry by one. The victim is the entry with the
//! highest age, which approximates "oldest since creation" rather than
//! "least recently used": a hit does not make an entry younger.

use std::collections::VecDeque;

use crate::cache::CacheEntry;

// == Eldest Index ==
/// Returns the position of the entry with the strictly greatest age.
///
/// Ties go to the first entry in traversal order (front to back).
/// Returns None if there are no entries.
pub fn eldest_index(entries: &VecDeque<CacheEntry>) -> Option<usize> {
    let mut eldest: Option<(usize, u64)> = None;
    for (idx, entry) in entries.iter().enumerate() {
        match eldest {
            Some((_, age)) if entry.age <= age => {}
            _ => eldest = Some((idx, entry.age)),
        }
    }
    eldest.map(|(idx, _)| idx)
}
