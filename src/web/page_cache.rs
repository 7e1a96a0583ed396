//! Rendered-page cache for the global feed.
//!
//! Entries are keyed by page number and viewer (the navigation bar differs per
//! user) and expire after a fixed TTL. Any post write clears the whole cache;
//! an expired entry is never served. The number of live entries is capped, the
//! oldest being evicted first.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Identifies one rendered global feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub page: i64,
    pub viewer: Option<i64>,
}

impl CacheKey {
    #[must_use]
    pub fn new(page: i64, viewer: Option<i64>) -> Self {
        Self { page, viewer }
    }
}

/// A cached HTML body.
#[derive(Debug, Clone)]
struct CachedPage {
    html: String,
    cached_at: Instant,
}

impl CachedPage {
    /// Check if this cache entry is still valid.
    fn is_valid(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// Default cap on stored pages.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Shared TTL cache of rendered pages.
#[derive(Debug)]
pub struct PageCache {
    entries: RwLock<HashMap<CacheKey, CachedPage>>,
    ttl: Duration,
    max_entries: usize,
}

impl PageCache {
    /// Create a new page cache. A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Limit the number of stored pages. Zero disables caching.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached HTML for `key`, if present and not expired.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|page| page.is_valid(self.ttl))
            .map(|page| page.html.clone())
    }

    /// Store rendered HTML for `key`, dropping expired entries and evicting
    /// the oldest ones once the cap is reached.
    pub fn insert(&self, key: CacheKey, html: String) {
        if self.ttl.is_zero() || self.max_entries == 0 {
            return;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, page| page.is_valid(self.ttl));
        while !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, page)| page.cached_at)
                .map(|(k, _)| *k)
            else {
                break;
            };
            entries.remove(&oldest);
        }
        entries.insert(
            key,
            CachedPage {
                html,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop every entry regardless of remaining TTL.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(dropped, "Page cache cleared");
    }

    /// Number of stored entries, including expired ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(20))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_validity() {
        let page = CachedPage {
            html: String::new(),
            cached_at: Instant::now(),
        };
        assert!(page.is_valid(Duration::from_secs(60)));

        let old_page = CachedPage {
            html: String::new(),
            cached_at: Instant::now() - Duration::from_secs(120),
        };
        assert!(!old_page.is_valid(Duration::from_secs(60)));
    }

    #[test]
    fn test_get_after_insert() {
        let cache = PageCache::new(Duration::from_secs(60));
        let key = CacheKey::new(1, None);

        assert!(cache.get(&key).is_none());
        cache.insert(key, "<p>feed</p>".to_string());
        assert_eq!(cache.get(&key).as_deref(), Some("<p>feed</p>"));
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert(CacheKey::new(1, None), "anon".to_string());
        cache.insert(CacheKey::new(1, Some(7)), "user 7".to_string());

        assert_eq!(cache.get(&CacheKey::new(1, None)).as_deref(), Some("anon"));
        assert_eq!(
            cache.get(&CacheKey::new(1, Some(7))).as_deref(),
            Some("user 7")
        );
        assert!(cache.get(&CacheKey::new(2, None)).is_none());
    }

    #[test]
    fn test_expired_entry_not_served() {
        let cache = PageCache::new(Duration::from_secs(60));
        let key = CacheKey::new(1, None);
        cache.entries.write().unwrap().insert(
            key,
            CachedPage {
                html: "stale".to_string(),
                cached_at: Instant::now() - Duration::from_secs(61),
            },
        );

        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_insert_prunes_expired() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.entries.write().unwrap().insert(
            CacheKey::new(9, None),
            CachedPage {
                html: "stale".to_string(),
                cached_at: Instant::now() - Duration::from_secs(61),
            },
        );

        cache.insert(CacheKey::new(1, None), "fresh".to_string());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert(CacheKey::new(1, None), "a".to_string());
        cache.insert(CacheKey::new(2, None), "b".to_string());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&CacheKey::new(1, None)).is_none());
    }

    #[test]
    fn test_insert_evicts_oldest_at_capacity() {
        let cache = PageCache::new(Duration::from_secs(60)).with_max_entries(2);
        cache.entries.write().unwrap().insert(
            CacheKey::new(1, None),
            CachedPage {
                html: "old".to_string(),
                cached_at: Instant::now() - Duration::from_secs(5),
            },
        );
        cache.insert(CacheKey::new(2, None), "b".to_string());
        cache.insert(CacheKey::new(3, None), "c".to_string());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&CacheKey::new(1, None)).is_none());
        assert_eq!(cache.get(&CacheKey::new(3, None)).as_deref(), Some("c"));
    }

    #[test]
    fn test_replacing_key_at_capacity_keeps_others() {
        let cache = PageCache::new(Duration::from_secs(60)).with_max_entries(2);
        cache.insert(CacheKey::new(1, None), "a".to_string());
        cache.insert(CacheKey::new(2, None), "b".to_string());
        cache.insert(CacheKey::new(2, None), "b2".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&CacheKey::new(1, None)).as_deref(), Some("a"));
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = PageCache::new(Duration::ZERO);
        cache.insert(CacheKey::new(1, None), "a".to_string());
        assert!(cache.is_empty());
    }
}
