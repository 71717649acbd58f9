use super::clock::{Clock, SystemClock};
use crate::logger::LOGGER;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub stored_at: i64,
    pub ttl_ms: u64,
}

impl<V> CacheEntry<V> {
    pub fn expires_at(&self) -> i64 {
        let ttl = i64::try_from(self.ttl_ms).unwrap_or(i64::MAX);
        self.stored_at.saturating_add(ttl)
    }

    pub fn is_live(&self, now: i64) -> bool {
        now < self.expires_at()
    }
}

/// Time-expiring key/value cache.
///
/// Entries are never evicted by capacity, only by TTL. Expired entries stay
/// in the map until the next read of the same key, an overwrite or `clear`,
/// so `size` may count entries that `get` would no longer return.
pub struct ResultCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        // The read guard is released above; only drop the entry if a
        // concurrent `set` has not already replaced it.
        if self
            .entries
            .remove_if(key, |_, entry| !entry.is_live(now))
            .is_some()
        {
            LOGGER.cache(&format!("Evicted expired entry {}", key));
        }
        None
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl_ms: u64) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            value,
            stored_at: self.clock.now_ms(),
            ttl_ms,
        };
        LOGGER.cache(&format!("Stored {} (ttl {} ms)", key, ttl_ms));
        self.entries.insert(key, entry);
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }
}
