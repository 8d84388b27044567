//! Time-expiring map from image transform parameters to rendition URLs.

use std::{
    sync::{Arc, Weak},
    time::Instant,
};

use dashmap::DashMap;
use metrics::counter;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::images::ImageCacheKey;

use super::config::ImageCacheConfig;

const METRIC_HIT: &str = "ikono_image_cache_hit_total";
const METRIC_MISS: &str = "ikono_image_cache_miss_total";
const METRIC_EVICT: &str = "ikono_image_cache_evict_total";

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    stored_at: Instant,
}

impl CachedUrl {
    fn is_fresh(&self, now: Instant, config: &ImageCacheConfig) -> bool {
        now.saturating_duration_since(self.stored_at) < config.ttl
    }
}

/// Shared cache of optimized image URLs.
///
/// Entries expire `ttl` after insertion. An expired entry is dropped when it is
/// read, and [`ImageUrlCache::sweep`] drops the ones nobody reads again.
#[derive(Debug, Default)]
pub struct ImageUrlCache {
    entries: DashMap<ImageCacheKey, CachedUrl>,
    config: ImageCacheConfig,
}

impl ImageUrlCache {
    pub fn new(config: ImageCacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn get(&self, key: &ImageCacheKey) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &ImageCacheKey, now: Instant) -> Option<String> {
        // Copy out of the guard before touching the map again.
        let lookup = self
            .entries
            .get(key)
            .map(|entry| (entry.url.clone(), entry.is_fresh(now, &self.config)));

        match lookup {
            Some((url, true)) => {
                counter!(METRIC_HIT).increment(1);
                Some(url)
            }
            Some((_, false)) => {
                if self
                    .entries
                    .remove_if(key, |_, entry| !entry.is_fresh(now, &self.config))
                    .is_some()
                {
                    counter!(METRIC_EVICT).increment(1);
                }
                counter!(METRIC_MISS).increment(1);
                None
            }
            None => {
                counter!(METRIC_MISS).increment(1);
                None
            }
        }
    }

    pub fn insert(&self, key: ImageCacheKey, url: impl Into<String>) {
        self.insert_at(key, url, Instant::now());
    }

    pub fn insert_at(&self, key: ImageCacheKey, url: impl Into<String>, stored_at: Instant) {
        self.entries.insert(
            key,
            CachedUrl {
                url: url.into(),
                stored_at,
            },
        );
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut removed = 0usize;
        self.entries.retain(|_, entry| {
            let keep = entry.is_fresh(now, &self.config);
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            counter!(METRIC_EVICT).increment(removed as u64);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Sweep every `sweep_interval` until the last strong handle is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = self.config.sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // Skip the first immediate tick
            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.sweep();
                if removed > 0 {
                    debug!(
                        target = "cache::store",
                        removed,
                        remaining = cache.len(),
                        "swept expired image URLs"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::domain::images::ImageOptions;

    use super::*;

    fn key(id: &str) -> ImageCacheKey {
        ImageCacheKey::new(id, &ImageOptions::default())
    }

    fn cache_with_ttl(ttl: Duration) -> ImageUrlCache {
        ImageUrlCache::new(ImageCacheConfig {
            ttl,
            ..Default::default()
        })
    }

    #[test]
    fn fresh_entries_are_returned() {
        let cache = cache_with_ttl(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at(key("a"), "https://cdn/a.webp", start);

        assert_eq!(
            cache.get_at(&key("a"), start + Duration::from_secs(59)),
            Some("https://cdn/a.webp".to_string())
        );
        assert_eq!(cache.get_at(&key("b"), start), None);
    }

    #[test]
    fn expired_entry_is_removed_on_read() {
        let cache = cache_with_ttl(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at(key("a"), "https://cdn/a.webp", start);

        assert_eq!(cache.get_at(&key("a"), start + Duration::from_secs(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let cache = cache_with_ttl(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at(key("old"), "old", start);
        cache.insert_at(key("new"), "new", start + Duration::from_secs(30));

        let removed = cache.sweep_at(start + Duration::from_secs(61));

        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get_at(&key("new"), start + Duration::from_secs(61)),
            Some("new".to_string())
        );
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = ImageUrlCache::default();
        cache.insert(key("a"), "a");
        cache.insert(key("b"), "b");
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn sweeper_removes_expired_entries_in_background() {
        let cache = Arc::new(ImageUrlCache::new(ImageCacheConfig {
            ttl: Duration::from_millis(10),
            sweep_interval: Duration::from_millis(20),
        }));
        cache.insert(key("a"), "a");
        let handle = cache.spawn_sweeper();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.is_empty());

        drop(cache);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper stops once the cache is dropped")
            .expect("sweeper task");
    }
}
