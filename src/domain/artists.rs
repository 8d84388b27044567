//! Artist ordering by representation type.

use ikono_cms_types::Artist;

/// Representation types in the order of the Cockpit select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtistType {
    Represented,
    Exhibited,
    Exclusive,
    Collection,
}

impl ArtistType {
    pub const ORDER: [ArtistType; 4] = [
        ArtistType::Represented,
        ArtistType::Exhibited,
        ArtistType::Exclusive,
        ArtistType::Collection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArtistType::Represented => "Represented",
            ArtistType::Exhibited => "Exhibited",
            ArtistType::Exclusive => "Exclusive",
            ArtistType::Collection => "Collection",
        }
    }
}

/// Position of `kind` in [`ArtistType::ORDER`], or `-1` when it is not listed.
///
/// Unlisted types therefore rank ahead of `Represented`. This mirrors the
/// lookup the gallery pages were built against and is kept until the product
/// owner decides where unknown types belong.
pub fn type_rank(kind: &str) -> i32 {
    ArtistType::ORDER
        .iter()
        .position(|candidate| candidate.label() == kind)
        .and_then(|index| i32::try_from(index).ok())
        .unwrap_or(-1)
}

/// Stable sort by [`type_rank`]; artists of the same type keep their CMS order.
pub fn sort_by_type(mut artists: Vec<Artist>) -> Vec<Artist> {
    artists.sort_by_key(|artist| type_rank(&artist.kind));
    artists
}
