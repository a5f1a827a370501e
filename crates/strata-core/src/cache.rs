//! Bounded in-memory cache with per-entry expiry

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted: Instant,
    /// Logical clock value of the last read or write, for LRU eviction.
    touched: u64,
}

/// Key-value cache holding at most `capacity` entries, each for at most `ttl`.
///
/// The least recently used entry is evicted when a new key would exceed the
/// capacity. A `set` on an existing key replaces the value.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    capacity: usize,
    ttl: Duration,
    clock: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
            clock: AtomicU64::new(0),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Get a cached value if present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let tick = self.tick();
        {
            let mut entry = self.entries.get_mut(key)?;
            if entry.inserted.elapsed() <= self.ttl {
                entry.touched = tick;
                return Some(entry.value.clone());
            }
        }
        self.entries.remove(key);
        None
    }

    /// Store a value, evicting the least recently used entry if full.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.cleanup_expired();
            if self.entries.len() >= self.capacity {
                self.evict_lru();
            }
        }
        let entry = CacheEntry {
            value,
            inserted: Instant::now(),
            touched: self.tick(),
        };
        self.entries.insert(key, entry);
    }

    fn evict_lru(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().touched)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            tracing::debug!("Evicting cache entry: {}", key);
            self.entries.remove(&key);
        }
    }

    /// Clear expired entries
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted.elapsed() <= ttl);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max: self.capacity,
        }
    }
}

/// Occupancy of one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max: usize,
}

/// Compute a short hash of file content for use as a cache key.
pub fn content_hash(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("h_{:x}", hasher.finish())
}
