//! Bounded LRU cache of query fingerprints.
//!
//! Keys are normalized query strings. A hit counts as a use, and inserting a
//! new key into a full cache evicts the least recently used one. Capacity 0
//! disables the cache: nothing is stored and every lookup misses.
//!
//! The cache only saves work. Matching results are the same with or without it.

use lru::LruCache;
use std::num::NonZeroUsize;

use crate::algorithms::Fingerprint;

#[derive(Debug)]
pub struct QueryHashCache {
    inner: Option<LruCache<String, Fingerprint>>,
}

impl QueryHashCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    /// Look up a fingerprint and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<Fingerprint> {
        self.inner.as_mut()?.get(key).copied()
    }

    /// Insert or update an entry.
    pub fn set(&mut self, key: impl Into<String>, fingerprint: Fingerprint) {
        let Some(cache) = self.inner.as_mut() else {
            return;
        };
        // push also hands back the old pair when the key was already present
        if let Some((evicted, _)) = cache.push(key.into(), fingerprint) {
            if !cache.contains(&evicted) {
                tracing::trace!(key = %evicted, "query cache eviction");
            }
        }
    }

    /// Return the cached fingerprint or compute, store and return it.
    pub fn get_or_insert_with<F>(&mut self, key: &str, compute: F) -> Fingerprint
    where
        F: FnOnce() -> Fingerprint,
    {
        if let Some(fingerprint) = self.get(key) {
            return fingerprint;
        }
        let fingerprint = compute();
        self.set(key, fingerprint);
        fingerprint
    }

    /// Membership test; does not affect recency.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.inner.as_ref().is_some_and(|cache| cache.contains(key))
    }

    pub fn clear(&mut self) {
        if let Some(cache) = self.inner.as_mut() {
            cache.clear();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, LruCache::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.as_ref().map_or(0, |cache| cache.cap().get())
    }
}
