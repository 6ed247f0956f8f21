//! Fixed-capacity LRU cache.
//!
//! Pairs a `HashMap` from key to arena slot with the index-linked recency
//! list in [`crate::arena`], so lookup, touch, removal and eviction are all
//! O(1) on average.

use std::borrow::{Borrow, Cow};
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::arena::Arena;
use crate::error::{LruError, Result};
use crate::iter::{IntoIter, Iter, Keys, Values};

/// Upper bound on storage reserved at construction time.
const PREALLOC_LIMIT: usize = 1024;

fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(LruError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// A fixed-capacity cache that evicts the least recently used entry.
///
/// Reads ([`get`](Self::get)), writes ([`insert`](Self::insert)) and
/// compute-inserts ([`get_or_insert_with`](Self::get_or_insert_with)) mark a
/// key as most recently used. When an insert would push the entry count past
/// the capacity, the least recently used entry is evicted first.
///
/// The cache is not internally synchronized. Wrap it in a `Mutex` to share it
/// between threads; every operation updates the key map and the recency list
/// together, so the whole cache must sit behind one lock.
///
/// ```
/// use lru_store::LruCache;
///
/// let mut cache = LruCache::new(2)?;
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get("a");
/// cache.insert("c", 3);
///
/// assert!(!cache.contains_key("b"));
/// assert_eq!(cache.to_vec(), vec![("c", 3), ("a", 1)]);
/// # Ok::<(), lru_store::LruError>(())
/// ```
#[derive(Clone)]
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, usize, S>,
    arena: Arena<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`LruError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Maximum number of entries held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.map.clear();
        self.arena.clear();
    }

    /// Iterate entries from most to least recently used.
    ///
    /// Iteration does not change recency order and can be restarted at any
    /// time by calling `iter` again.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.arena.iter())
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Values from most to least recently used.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// The entry that would be evicted next, without touching it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let node = self.arena.get(self.arena.tail()?)?;
        Some((&node.key, &node.value))
    }

    /// Entries cloned into a vector, most recently used first.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Create an empty cache that hashes keys with `hasher`.
    ///
    /// # Errors
    /// Returns [`LruError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        validate_capacity(capacity)?;
        let reserve = capacity.min(PREALLOC_LIMIT);
        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, hasher),
            arena: Arena::with_capacity(reserve),
            capacity,
        })
    }

    /// Look up a value and mark it most recently used.
    ///
    /// Returns `None` if the key is not cached; a miss changes nothing.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.arena.move_to_front(idx);
        Some(&self.arena.node(idx).value)
    }

    /// Mutable variant of [`get`](Self::get). Also marks the key most recently used.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.arena.move_to_front(idx);
        Some(&mut self.arena.node_mut(idx).value)
    }

    /// Look up a value without changing recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.arena.get(idx).map(|node| &node.value)
    }

    /// Check if a key is present. Does not change recency order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert or replace a value and mark it most recently used.
    ///
    /// Replacing an existing key never evicts. Inserting a new key into a full
    /// cache evicts the least recently used entry. Returns the stored value.
    pub fn insert(&mut self, key: K, value: V) -> &V {
        let existing = self.map.get(&key).copied();
        let idx = match existing {
            Some(idx) => {
                self.arena.node_mut(idx).value = value;
                self.arena.move_to_front(idx);
                idx
            }
            None => self.insert_new(key, value),
        };
        &self.arena.node(idx).value
    }

    /// Return the cached value for `key`, computing and inserting it on a miss.
    ///
    /// `compute` runs at most once, and only when the key is absent. A hit
    /// behaves exactly like [`get`](Self::get).
    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        match self.try_get_or_insert_with(key, || Ok::<V, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// # Errors
    /// Returns the error produced by `compute` unchanged. Nothing is inserted
    /// and recency order is left as it was.
    pub fn try_get_or_insert_with<F, E>(
        &mut self,
        key: K,
        compute: F,
    ) -> std::result::Result<&V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let existing = self.map.get(&key).copied();
        let idx = match existing {
            Some(idx) => {
                self.arena.move_to_front(idx);
                idx
            }
            None => {
                let value = compute()?;
                self.insert_new(key, value)
            }
        };
        Ok(&self.arena.node(idx).value)
    }

    /// Return the cached value, or `fallback()` without caching it.
    ///
    /// A hit marks the key most recently used. A miss leaves the cache untouched.
    pub fn fetch<Q, F>(&mut self, key: &Q, fallback: F) -> Cow<'_, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
        F: FnOnce() -> V,
    {
        match self.map.get(key).copied() {
            Some(idx) => {
                self.arena.move_to_front(idx);
                Cow::Borrowed(&self.arena.node(idx).value)
            }
            None => Cow::Owned(fallback()),
        }
    }

    /// Remove a key, returning its value if it was cached.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove a key, returning the stored key and value if it was cached.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        self.arena.remove(idx)
    }

    /// Remove and return the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.arena.pop_back()?;
        self.map.remove(&key);
        Some((key, value))
    }

    /// Change the capacity, evicting least recently used entries if it shrinks.
    ///
    /// # Errors
    /// Returns [`LruError::InvalidCapacity`] if `capacity` is zero; the cache
    /// is left unchanged.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;
        self.capacity = capacity;

        let mut evicted = 0usize;
        while self.len() > capacity && self.pop_lru().is_some() {
            evicted += 1;
        }
        if evicted > 0 {
            log::debug!("lru resized to {capacity}, evicted {evicted} entries");
        }
        Ok(())
    }

    /// Verify that the key map and the recency list agree.
    ///
    /// Diagnostic only: returns `true` for every reachable state, and logs the
    /// first violation at `warn` level otherwise.
    pub fn check_invariants(&self) -> bool {
        match self.audit() {
            Ok(()) => true,
            Err(reason) => {
                log::warn!("lru invariant violated: {reason}");
                false
            }
        }
    }

    fn audit(&self) -> std::result::Result<(), &'static str> {
        let order = self.arena.verify_links()?;
        if order.len() != self.map.len() {
            return Err("key map and recency list hold different entry counts");
        }
        for idx in order {
            let node = self.arena.get(idx).ok_or("listed slot is free")?;
            if self.map.get(&node.key) != Some(&idx) {
                return Err("key map does not point back at its list node");
            }
        }
        if self.map.len() > self.capacity {
            return Err("entry count exceeds capacity");
        }
        Ok(())
    }

    /// Link a key known to be absent at the head, evicting first if full.
    fn insert_new(&mut self, key: K, value: V) -> usize {
        if self.len() >= self.capacity && self.pop_lru().is_some() {
            log::trace!("lru full at {} entries, evicted least recently used", self.capacity);
        }
        let idx = self.arena.push_front(key.clone(), value);
        self.map.insert(key, idx);
        idx
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Extend<(K, V)> for LruCache<K, V, S> {
    /// Inserts in order, so the last pair ends up most recently used.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for LruCache<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Consume the cache, yielding entries from most to least recently used.
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena)
    }
}
