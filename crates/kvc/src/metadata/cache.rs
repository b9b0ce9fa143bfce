// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent metadata cache.
//!
//! The MetadataCache ensures that field enumeration happens only once per
//! type. Subsequent lookups are served under a shared read lock; the first
//! lookup for a type takes the write lock, re-checks, and enumerates while
//! holding it, so concurrent first callers never enumerate twice. Entries
//! are never evicted.

use super::{FieldDescriptor, TypeMetadata};
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::types::{Reflect, TypeInfo};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Time spent building the most recent entry.
    pub last_miss_ns: u64,
}

/// Write-once-per-type cache of [`TypeMetadata`].
///
/// Counters are atomics so that hits never contend on a lock.
pub struct MetadataCache {
    inner: RwLock<HashMap<TypeId, Arc<TypeMetadata>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    last_miss_ns: AtomicU64,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            last_miss_ns: AtomicU64::new(0),
        }
    }

    /// Metadata for `info`, enumerating it on first use.
    pub fn metadata_for(&self, info: &TypeInfo) -> Arc<TypeMetadata> {
        let key = info.type_id();

        if let Some(hit) = self.try_peek(&key) {
            self.record_hit();
            return hit;
        }

        let mut cache = self.inner.write();
        if let Some(hit) = cache.get(&key) {
            self.record_hit();
            return Arc::clone(hit);
        }

        // Enumeration never re-enters the cache, so building under the
        // write lock cannot deadlock.
        let start = Instant::now();
        let built = Arc::new(TypeMetadata::build(info));
        cache.insert(key, Arc::clone(&built));
        drop(cache);
        self.record_miss(start);

        log::debug!(
            "[kvc::cache] built metadata for {} ({}, {} fields)",
            built.type_name(),
            built.classification(),
            built.fields().len()
        );
        built
    }

    /// Shorthand for `metadata_for(&T::type_info())`.
    pub fn metadata_of<T: Reflect>(&self) -> Arc<TypeMetadata> {
        self.metadata_for(&T::type_info())
    }

    /// Ordered field descriptors of `info`.
    pub fn properties_for(&self, info: &TypeInfo) -> Vec<FieldDescriptor> {
        self.metadata_for(info).fields().to_vec()
    }

    /// True if `info` has already been enumerated.
    #[must_use]
    pub fn contains(&self, info: &TypeInfo) -> bool {
        self.inner.read().contains_key(&info.type_id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            last_miss_ns: self.last_miss_ns.load(Ordering::Relaxed),
        }
    }

    fn try_peek(&self, key: &TypeId) -> Option<Arc<TypeMetadata>> {
        let cache = self.inner.read();
        cache.get(key).map(Arc::clone)
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self, start: Instant) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.last_miss_ns
            .store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CACHE: OnceLock<MetadataCache> = OnceLock::new();

/// Process-wide cache used by the free functions and [`KeyValueCoding`](crate::KeyValueCoding).
pub fn global() -> &'static MetadataCache {
    GLOBAL_CACHE.get_or_init(MetadataCache::new)
}
