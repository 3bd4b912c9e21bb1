//! Memoization of resolved conversion paths
//!
//! Entries are keyed by `(from, to)` and hold the edge indices of the path
//! that was found for that pair. The cache is append-only: once a key is
//! present it is never replaced or evicted for the lifetime of the graph,
//! so a reader can hold on to a returned path while other threads insert.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Cache key for a `(from, to)` resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    pub from: String,
    pub to: String,
}

impl PathKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.from, self.to)
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of memoized paths
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to search the graph
    pub misses: u64,
}

/// Thread-safe, append-only path cache
#[derive(Debug, Default)]
pub struct PathCache {
    entries: RwLock<HashMap<PathKey, Arc<[usize]>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PathCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a path, counting the hit or miss
    pub fn get(&self, from: &str, to: &str) -> Option<Arc<[usize]>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let found = entries.get(&PathKey::new(from, to)).cloned();
        drop(entries);

        match found {
            Some(path) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(path)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a path unless the key is already present
    ///
    /// Returns the path stored under the key afterwards, which is the
    /// earlier entry when another caller got there first.
    pub fn insert(&self, key: PathKey, path: Arc<[usize]>) -> Arc<[usize]> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert(path).clone()
    }

    /// Whether a path is memoized for the pair, without touching counters
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&PathKey::new(from, to))
    }

    /// Number of memoized paths
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(PathKey::new("m", "in").to_string(), "m => in");
    }

    #[test]
    fn test_hits_and_misses() {
        let cache = PathCache::new();
        assert!(cache.get("m", "in").is_none());

        cache.insert(PathKey::new("m", "in"), Arc::from(vec![0, 1]));
        assert_eq!(cache.get("m", "in").as_deref(), Some(&[0, 1][..]));

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1,
            }
        );
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = PathCache::new();
        let first = cache.insert(PathKey::new("a", "c"), Arc::from(vec![0, 1]));
        let second = cache.insert(PathKey::new("a", "c"), Arc::from(vec![2, 3]));

        assert_eq!(&*first, &[0, 1]);
        assert_eq!(&*second, &[0, 1]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = Arc::new(PathCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.insert(PathKey::new("a", format!("u{}", i % 4)), Arc::from(vec![i]));
                    cache.get("a", "u0");
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 4);
        assert!(cache.contains("a", "u3"));
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 8);
    }
}
