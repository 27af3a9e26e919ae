//! Invoice list page caching using Moka.
//!
//! Pages are keyed by search text, status tab and page number. Any write to
//! an invoice clears the whole cache.

use moka::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use invoicer_shared::CacheConfig;

use crate::listing::StatusFilter;

/// Cache key for one list page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey {
    /// Search text, trimmed.
    pub query: String,
    /// Status tab.
    pub status: StatusFilter,
    /// Page number, at least 1.
    pub page: u32,
}

impl ListingKey {
    /// Creates a key, normalizing the query and page.
    #[must_use]
    pub fn new(query: &str, status: StatusFilter, page: u32) -> Self {
        Self {
            query: query.trim().to_string(),
            status,
            page: page.max(1),
        }
    }
}

/// Cache for invoice list pages.
///
/// Cloning shares the underlying cache.
pub struct ListingCache<V> {
    cache: Cache<ListingKey, Arc<V>>,
    generation: Arc<AtomicU64>,
}

impl<V> Clone for ListingCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<V: Send + Sync + 'static> ListingCache<V> {
    /// Creates a cache from configuration.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_config(config.capacity, config.ttl_secs)
    }

    /// Creates a cache with explicit capacity and time-to-live.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a cached page.
    #[must_use]
    pub fn get(&self, key: &ListingKey) -> Option<Arc<V>> {
        self.cache.get(key)
    }

    /// Returns the current generation. Read it before loading a page and
    /// pass it to [`ListingCache::insert`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Stores a page loaded during `generation`.
    ///
    /// The page is returned but not cached if a write invalidated the cache
    /// while it was loading, including an invalidation that lands between
    /// the generation check and the insert.
    pub fn insert(&self, key: ListingKey, value: V, generation: u64) -> Arc<V> {
        let value = Arc::new(value);
        if self.generation() != generation {
            return value;
        }

        self.cache.insert(key.clone(), Arc::clone(&value));
        if self.generation() != generation {
            self.cache.invalidate(&key);
        }
        value
    }

    /// Invalidates all cached pages.
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}
