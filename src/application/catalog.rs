//! Gallery content accessors: typed reads plus the domain post-processing
//! each page needs.

use futures::future::join_all;
use ikono_cms_types::{Artist, Artwork, Exhibition, HomePage, Page, Reference};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::{
    artists::sort_by_type,
    artworks::{ArtworksByArtist, highlighted, partition_by_edition},
    locale::Locale,
};

use super::{
    content::{ContentService, Fetched},
    repos::CollectionParams,
};

pub const ARTIST_COLLECTION: &str = "artist";
pub const ARTWORK_COLLECTION: &str = "artwork";
pub const EXHIBITION_COLLECTION: &str = "exhibition";
pub const PAGE_COLLECTION: &str = "page";
pub const HOME_PAGE_SINGLETON: &str = "homepage";

#[derive(Clone)]
pub struct Catalog {
    content: ContentService,
}

impl Catalog {
    pub fn new(content: ContentService) -> Self {
        Self { content }
    }

    /// All artists, ordered by representation type.
    pub async fn get_artists(&self, locale: Locale) -> Fetched<Vec<Artist>> {
        self.content
            .get_collection(ARTIST_COLLECTION, localized(locale))
            .await
            .map(sort_by_type)
    }

    pub async fn get_artist_by_id(&self, id: &str, locale: Locale) -> Fetched<Option<Artist>> {
        self.content
            .get_collection_item(ARTIST_COLLECTION, id, localized(locale))
            .await
    }

    pub async fn get_artworks(&self, locale: Locale) -> Fetched<Vec<Artwork>> {
        self.content
            .get_collection(ARTWORK_COLLECTION, localized(locale))
            .await
    }

    pub async fn get_artwork_by_id(&self, id: &str, locale: Locale) -> Fetched<Option<Artwork>> {
        self.content
            .get_collection_item(ARTWORK_COLLECTION, id, localized(locale))
            .await
    }

    /// Highlighted works, at most `limit`.
    ///
    /// Cockpit filters on `highlight`, and the result is filtered again here
    /// since the filter is ignored for fields missing from the model.
    pub async fn get_highlighted_artworks(
        &self,
        locale: Locale,
        limit: usize,
    ) -> Fetched<Vec<Artwork>> {
        let params = localized(locale).filter(json!({ "highlight": true }));
        self.content
            .get_collection::<Artwork>(ARTWORK_COLLECTION, params)
            .await
            .map(|artworks| highlighted(artworks, limit))
    }

    pub async fn get_artworks_by_artist(
        &self,
        artist_id: &str,
        locale: Locale,
    ) -> Fetched<ArtworksByArtist> {
        self.get_artworks(locale)
            .await
            .map(|artworks| partition_by_edition(artworks, artist_id))
    }

    pub async fn get_exhibitions(&self, locale: Locale) -> Fetched<Vec<Exhibition>> {
        self.content
            .get_collection(EXHIBITION_COLLECTION, localized(locale))
            .await
    }

    pub async fn get_exhibition_by_id(
        &self,
        id: &str,
        locale: Locale,
    ) -> Fetched<Option<Exhibition>> {
        self.content
            .get_collection_item(EXHIBITION_COLLECTION, id, localized(locale))
            .await
    }

    /// Artworks referenced by an exhibition, in reference order.
    pub async fn get_artworks_by_exhibition(
        &self,
        exhibition_id: &str,
        locale: Locale,
    ) -> Fetched<Vec<Artwork>> {
        let (exhibition, reason) = self
            .get_exhibition_by_id(exhibition_id, locale)
            .await
            .into_parts();

        let Some(exhibition) = exhibition else {
            return match reason {
                Some(reason) => Fetched::degraded(reason),
                None => Fetched::Fresh(Vec::new()),
            };
        };

        self.resolve_references(&exhibition.artworks, ARTWORK_COLLECTION, locale)
            .await
    }

    /// Resolve `references` concurrently, keeping those that resolve.
    ///
    /// A reference without a model is looked up in `fallback_model`. Every
    /// lookup runs to completion; missing or failed ones are dropped.
    pub async fn resolve_references<T: DeserializeOwned>(
        &self,
        references: &[Reference],
        fallback_model: &str,
        locale: Locale,
    ) -> Fetched<Vec<T>> {
        let lookups = references.iter().map(|reference| {
            let model = if reference.model.is_empty() {
                fallback_model
            } else {
                reference.model.as_str()
            };
            self.content
                .get_collection_item::<T>(model, &reference.id, localized(locale))
        });

        let mut failed = 0usize;
        let mut resolved = Vec::with_capacity(references.len());
        for outcome in join_all(lookups).await {
            if outcome.is_degraded() {
                failed += 1;
            }
            resolved.extend(outcome.into_value());
        }

        debug!(
            target = "application::catalog",
            requested = references.len(),
            resolved = resolved.len(),
            failed,
            "resolved references"
        );

        if failed > 0 {
            Fetched::Degraded {
                value: resolved,
                reason: format!(
                    "{failed} of {} references failed to resolve",
                    references.len()
                ),
            }
        } else {
            Fetched::Fresh(resolved)
        }
    }

    pub async fn get_home_page(&self, locale: Locale) -> Fetched<Option<HomePage>> {
        self.content
            .get_singleton(HOME_PAGE_SINGLETON, localized(locale))
            .await
    }

    pub async fn get_home_carousel_artists(&self, locale: Locale) -> Fetched<Vec<Artist>> {
        self.resolve_home_carousel(locale, ARTIST_COLLECTION, |home| &home.carousel_artists)
            .await
    }

    pub async fn get_home_carousel_artworks(&self, locale: Locale) -> Fetched<Vec<Artwork>> {
        self.resolve_home_carousel(locale, ARTWORK_COLLECTION, |home| &home.carousel_artworks)
            .await
    }

    async fn resolve_home_carousel<T: DeserializeOwned>(
        &self,
        locale: Locale,
        model: &str,
        select: impl FnOnce(&HomePage) -> &Vec<Reference>,
    ) -> Fetched<Vec<T>> {
        let (home, reason) = self.get_home_page(locale).await.into_parts();
        match (home, reason) {
            (Some(home), _) => self.resolve_references(select(&home), model, locale).await,
            (None, Some(reason)) => Fetched::degraded(reason),
            (None, None) => Fetched::Fresh(Vec::new()),
        }
    }

    pub async fn get_pages(&self, locale: Locale) -> Fetched<Vec<Page>> {
        self.content
            .get_collection(PAGE_COLLECTION, localized(locale))
            .await
    }

    pub async fn get_page_by_id(&self, id: &str, locale: Locale) -> Fetched<Option<Page>> {
        self.content
            .get_collection_item(PAGE_COLLECTION, id, localized(locale))
            .await
    }
}

fn localized(locale: Locale) -> CollectionParams {
    CollectionParams::new().locale(locale)
}
