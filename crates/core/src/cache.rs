//! In-memory key/value cache with per-entry expiry.
//!
//! Used for read-mostly public data (category lists, sitemap XML, identity
//! provider signing keys). Expired entries are treated as absent on read
//! and removed lazily or by [`TtlCache::purge_expired`].

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    default_ttl: Duration,
    /// Bumped by every invalidation, under the write lock.
    generation: AtomicU64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Return a clone of the cached value if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    /// Insert with the cache's default TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl).await;
    }

    pub async fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Remove one key. Returns whether a live or expired entry existed.
    pub async fn invalidate(&self, key: &K) -> bool {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.remove(key).is_some()
    }

    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.clear();
    }

    /// Drop every expired entry and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, including ones that expired but were not purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Return the cached value or compute, store, and return it.
    ///
    /// Errors from `load` are returned as-is and nothing is cached.
    /// Concurrent misses may each call `load`; the last write wins. A value
    /// whose load overlapped an invalidation is returned but not stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(v) = self.get(&key).await {
            return Ok(v);
        }
        let started_at = self.generation.load(Ordering::SeqCst);
        let value = load().await?;

        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::SeqCst) == started_at {
            entries.insert(
                key,
                Entry {
                    value: value.clone(),
                    expires_at: Instant::now() + self.default_ttl,
                },
            );
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("categories", vec![1, 2, 3]).await;
        assert_eq!(cache.get(&"categories").await, Some(vec![1, 2, 3]));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&"categories").await, None);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_ttl_overrides_default() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache
            .insert_with_ttl("short", 1, Duration::from_secs(5))
            .await;
        cache.insert("long", 2).await;

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get(&"short").await, None);
        assert_eq!(cache.get(&"long").await, Some(2));
    }

    #[tokio::test]
    async fn invalidate_removes_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "a").await;
        cache.insert(2, "b").await;
        assert!(cache.invalidate(&1).await);
        assert!(!cache.invalidate(&1).await);
        cache.invalidate_all().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn loader_runs_only_on_miss() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        let loads = AtomicU32::new(0);
        for _ in 0..3 {
            let value: Result<u32, ()> = cache
                .get_or_try_insert_with("k", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(value, Ok(7));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_overlapping_invalidation_is_not_stored() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        let stale: Result<u32, ()> = cache
            .get_or_try_insert_with("categories", || async {
                cache.invalidate_all().await;
                Ok(1)
            })
            .await;
        assert_eq!(stale, Ok(1));
        assert_eq!(cache.get(&"categories").await, None);

        let fresh: Result<u32, ()> = cache.get_or_try_insert_with("categories", || async { Ok(2) }).await;
        assert_eq!(fresh, Ok(2));
        assert_eq!(cache.get(&"categories").await, Some(2));
    }

    #[tokio::test]
    async fn loader_error_is_not_cached() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        let result: Result<u32, &str> = cache.get_or_try_insert_with("k", || async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty().await);
    }
}
