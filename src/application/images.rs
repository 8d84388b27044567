//! Optimized image URLs backed by the shared URL cache.

use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::{
    cache::ImageUrlCache,
    domain::images::{ImageCacheKey, ImageOptions, optimal_quality, srcset_breakpoints},
};

use super::repos::ContentGateway;

/// Quality used when warming renditions ahead of a render.
pub const PRELOAD_QUALITY: u8 = 60;

#[derive(Clone)]
pub struct ImageOptimizer {
    gateway: Arc<dyn ContentGateway>,
    cache: Arc<ImageUrlCache>,
}

impl ImageOptimizer {
    pub fn new(gateway: Arc<dyn ContentGateway>, cache: Arc<ImageUrlCache>) -> Self {
        Self { gateway, cache }
    }

    pub fn cache(&self) -> &Arc<ImageUrlCache> {
        &self.cache
    }

    /// URL of the rendition described by `options`.
    ///
    /// Never fails: when Cockpit cannot produce the rendition the original
    /// asset URL is returned, and cached like a real rendition.
    pub async fn get_optimized_image(&self, image_id: &str, options: &ImageOptions) -> String {
        let key = ImageCacheKey::new(image_id, options);
        if let Some(url) = self.cache.get(&key) {
            return url;
        }

        let query = key.transform_query(options.progressive);
        let url = match self.gateway.fetch_image_url(image_id, &query).await {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            Ok(_) => {
                warn!(
                    target = "application::images",
                    image_id,
                    key = %key,
                    "image transform returned an empty body, using original asset"
                );
                self.gateway.asset_url(image_id)
            }
            Err(err) => {
                warn!(
                    target = "application::images",
                    image_id,
                    key = %key,
                    error = %err,
                    "image transform failed, using original asset"
                );
                self.gateway.asset_url(image_id)
            }
        };

        self.cache.insert(key, url.clone());
        url
    }

    /// `srcset` value for `image_id`, one candidate per usable breakpoint.
    ///
    /// Breakpoints wider than one and a half times the base width are skipped.
    /// Each candidate starts from the quality suited to its width, which the
    /// rendition lookup then adjusts again. Returns an empty string when none
    /// qualify.
    pub async fn generate_responsive_srcset(
        &self,
        image_id: &str,
        base: &ImageOptions,
        breakpoints: &[u32],
    ) -> String {
        let widths = srcset_breakpoints(base.width, breakpoints);
        let renditions = widths.into_iter().map(|width| {
            let options = ImageOptions {
                quality: optimal_quality(width, base.quality),
                ..base.scaled_to(width)
            };
            async move { (width, self.get_optimized_image(image_id, &options).await) }
        });

        join_all(renditions)
            .await
            .into_iter()
            .filter(|(_, url)| !url.is_empty())
            .map(|(width, url)| format!("{url} {width}w"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Warm the cache for `image_ids`, returning their URLs in input order.
    pub async fn preload<S: AsRef<str>>(
        &self,
        image_ids: &[S],
        options: Option<ImageOptions>,
    ) -> Vec<String> {
        let options = options.unwrap_or(ImageOptions {
            quality: PRELOAD_QUALITY,
            ..ImageOptions::default()
        });
        join_all(
            image_ids
                .iter()
                .map(|id| self.get_optimized_image(id.as_ref(), &options)),
        )
        .await
    }
}
