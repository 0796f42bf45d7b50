//! Thread-safe handle around a [`RecencyCache`].

use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use crate::recency::RecencyCache;

/// A [`RecencyCache`] shared by every build request in a process.
///
/// Every operation takes the lock for its whole duration, so concurrent
/// requests observe the same promotion and eviction order as if they had run
/// one after another. Values are cloned out; store `Arc`s for large values.
///
/// The cache is created once when the process starts and handed to each
/// request. It is never cleared.
pub struct SharedCache<K, V> {
    inner: Mutex<RecencyCache<K, V>>,
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty shared cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RecencyCache::new(capacity)),
        }
    }

    /// Returns `true` if `key` is present, without promoting it.
    pub fn has_key(&self, key: &K) -> bool {
        self.lock().has_key(key)
    }

    /// Returns a clone of the value for `key`, promoting it.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Inserts or overwrites `key`, promoting it and evicting if over capacity.
    pub fn set(&self, key: K, value: V) {
        self.lock().set(key, value);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Returns the keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys()
    }

    fn lock(&self) -> MutexGuard<'_, RecencyCache<K, V>> {
        lock_unpoison(&self.inner)
    }
}

/// Takes the lock even if a previous holder panicked.
///
/// Every critical section leaves the cache consistent before it can panic, so
/// a poisoned lock still guards valid state.
fn lock_unpoison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

impl<K, V> fmt::Debug for SharedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn delegates_to_recency_cache() {
        let cache = SharedCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.has_key(&"a"));
        assert_eq!(cache.keys(), vec!["b", "a"]);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.keys(), vec!["a", "b"]);
        cache.set("c", 3);
        assert!(!cache.has_key(&"b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn concurrent_writers_respect_capacity() {
        let cache = Arc::new(SharedCache::new(64));
        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500u32 {
                        cache.set((t, i), i);
                        cache.get(&(t, i / 2));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let keys = cache.keys();
        assert_eq!(keys.len(), 64);
        for key in &keys {
            assert_eq!(cache.get(key), Some(key.1));
        }
    }

    #[test]
    fn survives_poisoned_lock() {
        let cache = Arc::new(SharedCache::new(4));
        cache.set(1, "one");
        let poisoner = Arc::clone(&cache);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("poison");
        })
        .join();
        assert_eq!(cache.get(&1), Some("one"));
    }
}
