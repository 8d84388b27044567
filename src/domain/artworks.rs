//! Artwork filtering and partitioning.

use ikono_cms_types::Artwork;
use serde::Serialize;

pub const DEFAULT_HIGHLIGHT_LIMIT: usize = 20;

/// An artist's works split by edition type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtworksByArtist {
    pub standard: Vec<Artwork>,
    pub limited_edition: Vec<Artwork>,
}

impl ArtworksByArtist {
    pub fn len(&self) -> usize {
        self.standard.len() + self.limited_edition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.limited_edition.is_empty()
    }
}

/// Keep works referencing `artist_id`, split on the limited-edition flag.
pub fn partition_by_edition(
    artworks: impl IntoIterator<Item = Artwork>,
    artist_id: &str,
) -> ArtworksByArtist {
    let (limited_edition, standard) = artworks
        .into_iter()
        .filter(|artwork| artwork.is_by(artist_id))
        .partition(|artwork| artwork.limited_edition);

    ArtworksByArtist {
        standard,
        limited_edition,
    }
}

/// Highlighted works only, at most `limit` of them, in CMS order.
pub fn highlighted(artworks: impl IntoIterator<Item = Artwork>, limit: usize) -> Vec<Artwork> {
    artworks
        .into_iter()
        .filter(|artwork| artwork.highlight)
        .take(limit)
        .collect()
}
