//! In-process TTL cache.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::store::CacheStore;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// TTL cache backed by a sharded concurrent map.
///
/// Reads and writes on different keys proceed independently; there is no
/// global lock. Expired entries are removed when touched, or in bulk via
/// [`CacheStore::purge_expired`].
pub struct MemoryCache<K, V> {
    entries: DashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V> MemoryCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStore<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn put(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    fn invalidate_matching(&self, pred: &dyn Fn(&K) -> bool) {
        self.entries.retain(|key, _| !pred(key));
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
