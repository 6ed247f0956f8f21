//! Common test utilities and assertion helpers.
//!
//! Builders for small string-keyed caches and assertions that check recency
//! order together with the structural invariants.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use lru_store::LruCache;

/// The cache shape most tests use: `&'static str` keys, `i32` values.
pub type TestCache = LruCache<&'static str, i32>;

/// Build a cache with `capacity` and insert `pairs` in order.
///
/// The last pair ends up most recently used.
#[must_use]
pub fn cache_with(capacity: usize, pairs: &[(&'static str, i32)]) -> TestCache {
    let mut cache = LruCache::new(capacity).expect("capacity must be positive");
    cache.extend(pairs.iter().copied());
    cache
}

/// Assert the cache holds exactly `expected`, most recently used first,
/// and that its key map and recency list agree.
pub fn assert_order(cache: &TestCache, expected: &[(&'static str, i32)]) {
    assert_eq!(cache.to_vec(), expected, "recency order mismatch");
    assert_eq!(cache.len(), expected.len());
    assert!(cache.len() <= cache.capacity(), "cache exceeds capacity");
    assert!(cache.check_invariants(), "cache invariants violated");
}

/// Assert every key in `keys` is absent without touching the rest.
pub fn assert_absent(cache: &TestCache, keys: &[&str]) {
    for key in keys {
        assert!(!cache.contains_key(*key), "{key} should have been evicted");
    }
}
