//! lru-store - fixed-capacity LRU cache
//!
//! An in-memory key/value cache that holds at most `capacity` entries and
//! evicts the least recently used one when full:
//! - O(1) average lookup, insert, update, remove and eviction
//! - Reads, writes and compute-inserts mark an entry most recently used
//! - Membership checks, `peek` and iteration leave recency order alone
//! - Capacity can be changed at runtime; shrinking evicts immediately
//! - No `unsafe`: the recency list is an index-linked arena
//!
//! # Usage
//!
//! ```rust
//! use lru_store::LruCache;
//!
//! let mut cache = LruCache::new(3)?;
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.insert("c", 3);
//! cache.get("a");
//! cache.insert("d", 4);
//!
//! let order: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
//! assert_eq!(order, vec![("d", 4), ("a", 1), ("c", 3)]);
//!
//! let squared = *cache.get_or_insert_with("e", || 5 * 5);
//! assert_eq!(squared, 25);
//! # Ok::<(), lru_store::LruError>(())
//! ```
//!
//! The cache is single-threaded. Share it across threads behind one lock,
//! e.g. `Mutex<LruCache<K, V>>`.

mod arena;
pub mod cache;
pub mod error;
pub mod iter;
#[cfg(feature = "serde")]
mod snapshot;

pub use cache::LruCache;
pub use error::LruError;
pub use iter::{IntoIter, Iter, Keys, Values};

