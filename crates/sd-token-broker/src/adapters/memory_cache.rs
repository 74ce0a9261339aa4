//! In-process TTL cache.
//!
//! Entries expire once `now >= written_at + ttl`. Expired entries are
//! invisible to `get` and are physically dropped by `delete`,
//! `purge_expired`, when a full cache needs room, or by a sweep on `put`
//! once the map reaches the prune watermark.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::domain::errors::StoreError;
use crate::ports::outbound::{CacheBackend, TimeSource, Timestamp};

use super::time::SystemTimeSource;

/// Map size that triggers the first sweep of expired entries on `put`.
pub const DEFAULT_PRUNE_WATERMARK: usize = 1024;

struct Entry {
    value: Vec<u8>,
    expires_at: Timestamp,
}

impl Entry {
    fn is_live(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// `CacheBackend` held in process memory.
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn TimeSource>,
    /// Maximum number of entries; `None` for unbounded.
    capacity: Option<usize>,
    /// Floor for the sweep threshold.
    prune_watermark: usize,
    /// Map size at which the next `put` sweeps expired entries. Tracks twice
    /// the live set after each sweep.
    next_prune_at: AtomicUsize,
}

impl InMemoryCache {
    /// Unbounded cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemTimeSource))
    }

    pub fn with_clock(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            capacity: None,
            prune_watermark: DEFAULT_PRUNE_WATERMARK,
            next_prune_at: AtomicUsize::new(DEFAULT_PRUNE_WATERMARK),
        }
    }

    /// Decline writes of new keys once `capacity` live entries are held.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sweep expired entries on `put` once the map holds `watermark` entries.
    pub fn with_prune_watermark(mut self, watermark: usize) -> Self {
        let watermark = watermark.max(1);
        self.prune_watermark = watermark;
        self.next_prune_at = AtomicUsize::new(watermark);
        self
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            trace!(purged, "Purged expired cache entries");
        }
        purged
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        if let Some(capacity) = self.capacity {
            if !entries.contains_key(key) && entries.len() >= capacity {
                entries.retain(|_, e| e.is_live(now));
                if entries.len() >= capacity {
                    trace!(key, capacity, "Cache full, declining write");
                    return Ok(false);
                }
            }
        }

        if entries.len() >= self.next_prune_at.load(Ordering::Relaxed) {
            let before = entries.len();
            entries.retain(|_, e| e.is_live(now));
            let next = (entries.len() * 2).max(self.prune_watermark);
            self.next_prune_at.store(next, Ordering::Relaxed);
            trace!(
                purged = before - entries.len(),
                next_prune_at = next,
                "Swept expired cache entries"
            );
        }

        entries.insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: now.saturating_add(ttl.as_secs()),
            },
        );
        trace!(key, ttl_secs = ttl.as_secs(), "Cache entry written");
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let now = self.clock.now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().remove(key).is_some())
    }
}
