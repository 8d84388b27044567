//! Image URL cache.
//!
//! Remembers the URL Cockpit returned for each image rendition so repeated
//! renders do not hit the transform endpoint again.
//!
//! ## Configuration
//!
//! ```toml
//! [images]
//! cache_ttl_seconds = 3600
//! sweep_interval_seconds = 1800
//! ```

mod config;
mod store;

pub use config::ImageCacheConfig;
pub use store::ImageUrlCache;
