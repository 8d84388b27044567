//! Image URL cache configuration.
//!
//! Controlled via the `[images]` section of `ikono.toml`.

use std::time::Duration;

const DEFAULT_TTL_SECS: u64 = 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCacheConfig {
    /// How long a cached URL stays valid.
    pub ttl: Duration,
    /// Period of the background sweep removing expired entries.
    pub sweep_interval: Duration,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl From<&crate::config::ImageSettings> for ImageCacheConfig {
    fn from(settings: &crate::config::ImageSettings) -> Self {
        Self {
            ttl: settings.cache_ttl,
            sweep_interval: settings.sweep_interval,
        }
    }
}
