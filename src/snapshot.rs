//! Serde support for [`LruCache`].
//!
//! A cache serializes as its capacity plus its entries, most recently used
//! first:
//!
//! ```json
//! {"capacity": 3, "entries": [["c", 3], ["b", 2]]}
//! ```
//!
//! Deserializing replays the entries from least to most recently used, so the
//! recency order survives a round trip.

use std::hash::{BuildHasher, Hash};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::LruCache;

#[derive(Serialize)]
struct SnapshotRef<'a, K, V> {
    capacity: usize,
    entries: Vec<(&'a K, &'a V)>,
}

#[derive(Deserialize)]
struct Snapshot<K, V> {
    capacity: usize,
    entries: Vec<(K, V)>,
}

impl<K: Serialize, V: Serialize, S> Serialize for LruCache<K, V, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        SnapshotRef {
            capacity: self.capacity(),
            entries: self.iter().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, K, V, S> Deserialize<'de> for LruCache<K, V, S>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = Snapshot::<K, V>::deserialize(deserializer)?;
        let mut cache =
            Self::with_hasher(snapshot.capacity, S::default()).map_err(D::Error::custom)?;
        cache.extend(snapshot.entries.into_iter().rev());
        Ok(cache)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_lists_most_recent_first() {
        let mut cache = LruCache::new(3).unwrap();
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.get("a");

        let json = serde_json::to_string(&cache).unwrap();
        assert_eq!(json, r#"{"capacity":3,"entries":[["a",1],["b",2]]}"#);
    }
}
