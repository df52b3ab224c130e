//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the size bound and the aging/eviction rules.

use proptest::prelude::*;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_CAPACITY: usize = 4096;
const TEST_MAX_OBJECT: usize = 512;

// == Strategies ==
/// Generates cache keys shaped like `host + path`
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}\\.com/[a-z0-9/]{0,12}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: String },
    Lookup { key: String },
    Evict,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        key_strategy().prop_map(|key| CacheOp::Insert { key }),
        key_strategy().prop_map(|key| CacheOp::Lookup { key }),
        Just(CacheOp::Evict),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With uniformly sized objects one eviction always makes room, so the
    // total never exceeds capacity and always equals the sum of entry sizes.
    #[test]
    fn prop_total_size_bounded(
        object_size in 0usize..=TEST_MAX_OBJECT,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MAX_OBJECT);

        for op in ops {
            match op {
                CacheOp::Insert { key } => {
                    if !store.contains(&key) {
                        store.insert(key, vec![7u8; object_size]);
                    }
                }
                CacheOp::Lookup { key } => {
                    let _ = store.lookup(&key);
                }
                CacheOp::Evict => {
                    let _ = store.evict();
                }
            }

            let summed: usize = store.iter().map(|e| e.size).sum();
            prop_assert_eq!(store.total_size(), summed, "Size bookkeeping drifted");
            prop_assert!(
                store.total_size() <= TEST_CAPACITY,
                "Total size {} exceeds capacity {}",
                store.total_size(),
                TEST_CAPACITY
            );
        }
    }

    // Every probe of a non-empty cache ages every entry by exactly one.
    #[test]
    fn prop_every_probe_ages_all_entries(
        keys in prop::collection::vec(key_strategy(), 1..8),
        probes in prop::collection::vec(key_strategy(), 1..20)
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MAX_OBJECT);
        for key in &keys {
            store.insert(key.clone(), vec![1u8; 8]);
        }

        for probe in &probes {
            let before: Vec<u64> = store.iter().map(|e| e.age).collect();
            let _ = store.lookup(probe);
            let after: Vec<u64> = store.iter().map(|e| e.age).collect();
            for (b, a) in before.iter().zip(after.iter()) {
                prop_assert_eq!(*a, *b + 1);
            }
        }
    }

    // An insert into a full cache evicts exactly one entry, the eldest.
    #[test]
    fn prop_full_insert_evicts_one_eldest(
        sizes in prop::collection::vec(256usize..=TEST_MAX_OBJECT, 1..40),
        probes in prop::collection::vec(0usize..40, 0..30),
        new_size in 0usize..=TEST_MAX_OBJECT
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MAX_OBJECT);
        for (i, size) in sizes.iter().enumerate() {
            if store.is_full() {
                break;
            }
            store.insert(format!("host.com/{}", i), vec![0u8; *size]);
            if let Some(p) = probes.get(i) {
                let _ = store.lookup(&format!("host.com/{}", p));
            }
        }
        prop_assume!(store.is_full());

        let max_age = store.iter().map(|e| e.age).max().unwrap_or(0);
        let victim = store
            .iter()
            .find(|e| e.age == max_age)
            .map(|e| (e.key.clone(), e.size));
        prop_assume!(victim.is_some());
        let (victim_key, victim_size) = victim.unwrap_or_default();

        let len_before = store.len();
        let size_before = store.total_size();
        let evictions_before = store.stats().evictions;

        store.insert("fresh.com/".to_string(), vec![0u8; new_size]);

        prop_assert_eq!(store.stats().evictions, evictions_before + 1);
        prop_assert_eq!(store.len(), len_before);
        prop_assert_eq!(store.total_size(), size_before - victim_size + new_size);
        prop_assert!(!store.contains(&victim_key));
    }

    // Inserting with room to spare never evicts and adds exactly the object size.
    #[test]
    fn prop_insert_with_room_never_evicts(
        sizes in prop::collection::vec(0usize..=TEST_MAX_OBJECT, 1..6)
    ) {
        // 5 * 512 + 512 <= 4096, the cache can never be full here
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_MAX_OBJECT);
        for (i, size) in sizes.iter().enumerate() {
            let before = store.total_size();
            store.insert(format!("k{}", i), vec![0u8; *size]);
            prop_assert_eq!(store.total_size(), before + size);
        }
        prop_assert_eq!(store.stats().evictions, 0);
        prop_assert_eq!(store.len(), sizes.len());
    }
}
