//! Shared content types for the Ikono gallery site.
//!
//! Each record mirrors a Cockpit model as the content API returns it. Fields the
//! CMS may leave empty are optional or defaulted, so a half-filled entry never
//! breaks decoding of a whole collection. Cross-entity links are [`Reference`]s
//! and are never resolved implicitly.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit JSON `null` as the field's default value.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Asset attached to a content entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "altText", skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// Weak pointer to another content entry, identified by model name and id.
///
/// Some fields store bare `{ "_id": ... }` links; `model` is then empty and the
/// caller decides which collection to look in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    #[serde(rename = "_model", deserialize_with = "null_default")]
    pub model: String,
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
}

impl Reference {
    pub fn new(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    #[serde(deserialize_with = "null_default")]
    pub category: String,
    #[serde(deserialize_with = "null_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySet {
    #[serde(deserialize_with = "null_default")]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroCarouselItem {
    pub hero_carousel_img: Option<Image>,
    #[serde(deserialize_with = "null_default")]
    pub hero_carousel_title: String,
    #[serde(deserialize_with = "null_default")]
    pub hero_carousel_text: String,
    #[serde(deserialize_with = "null_default")]
    pub hero_carousel_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    pub image: Option<Image>,
    pub image_hover: Option<Image>,
    #[serde(deserialize_with = "null_default")]
    pub carousel: Vec<Image>,
    pub birthyear: Option<i32>,
    pub deathyear: Option<i32>,
    #[serde(rename = "categorySet", deserialize_with = "null_default")]
    pub category_set: Vec<CategorySet>,
    /// CMS select value: Represented, Exhibited, Exclusive or Collection.
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    pub level: Option<String>,
    pub statement: Option<String>,
    pub biography: Option<String>,
    pub achievements: Option<Vec<Achievement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artwork {
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    pub image: Option<Image>,
    pub image_hover: Option<Image>,
    #[serde(deserialize_with = "null_default")]
    pub images_add: Vec<Image>,
    pub artist: Option<Reference>,
    pub year: Option<i32>,
    pub size: Option<String>,
    pub price: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub sold: bool,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub medium: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub subject: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub limited_edition: bool,
    #[serde(deserialize_with = "null_default")]
    pub highlight: bool,
}

impl Artwork {
    /// Whether the artwork's artist reference points at `artist_id`.
    pub fn is_by(&self, artist_id: &str) -> bool {
        self.artist
            .as_ref()
            .is_some_and(|reference| reference.id == artist_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exhibition {
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    pub image: Option<Image>,
    pub location: Option<String>,
    /// ISO date string as stored in the CMS.
    #[serde(deserialize_with = "null_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_default")]
    pub end_date: String,
    pub artist: Option<Reference>,
    #[serde(deserialize_with = "null_default")]
    pub artworks: Vec<Reference>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomePage {
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub hero_carousel: Vec<HeroCarouselItem>,
    #[serde(deserialize_with = "null_default")]
    pub intro_title: String,
    #[serde(deserialize_with = "null_default")]
    pub intro_text: String,
    #[serde(deserialize_with = "null_default")]
    pub exclusive_title: String,
    #[serde(deserialize_with = "null_default")]
    pub exclusive_text: String,
    pub exclusive_image: Option<Image>,
    pub exclusive_logo: Option<Image>,
    #[serde(deserialize_with = "null_default")]
    pub carousel_artists: Vec<Reference>,
    #[serde(deserialize_with = "null_default")]
    pub carousel_artworks: Vec<Reference>,
    #[serde(deserialize_with = "null_default")]
    pub carousel_classic_collection: Vec<Reference>,
    #[serde(deserialize_with = "null_default")]
    pub carousel_japanese_collection: Vec<Reference>,
}

/// Free-form page from the `page` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(rename = "_id", deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    pub image: Option<Image>,
    pub content: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artwork_decodes_cms_payload_with_missing_fields() {
        let json = r#"{
            "_id": "aw1",
            "title": "Red Crane",
            "slug": "red-crane",
            "artist": {"_model": "artist", "_id": "ar1"},
            "highlight": true,
            "medium": ["Ink"],
            "_created": 1700000000
        }"#;

        let artwork: Artwork = serde_json::from_str(json).expect("artwork decodes");
        assert_eq!(artwork.id, "aw1");
        assert!(artwork.highlight);
        assert!(!artwork.limited_edition);
        assert!(!artwork.sold);
        assert!(artwork.is_by("ar1"));
        assert!(!artwork.is_by("ar2"));
        assert!(artwork.images_add.is_empty());
    }

    #[test]
    fn explicit_nulls_read_as_defaults() {
        let json = r#"{"_id": "aw2", "sold": null, "limited_edition": null,
            "images_add": null, "artist": null}"#;

        let artwork: Artwork = serde_json::from_str(json).expect("artwork decodes");
        assert!(!artwork.sold);
        assert!(!artwork.limited_edition);
        assert!(artwork.images_add.is_empty());
        assert!(artwork.artist.is_none());
    }

    #[test]
    fn artist_type_maps_to_kind() {
        let json = r#"{"_id": "ar1", "name": "Hokusai", "type": "Represented",
            "categorySet": [{"category": "Print"}],
            "achievements": [{"category": "Award", "year": 2020, "title": "A"}]}"#;

        let artist: Artist = serde_json::from_str(json).expect("artist decodes");
        assert_eq!(artist.kind, "Represented");
        assert_eq!(artist.category_set[0].category, "Print");
        assert_eq!(artist.achievements.as_ref().map(Vec::len), Some(1));

        let back = serde_json::to_value(&artist).expect("artist encodes");
        assert_eq!(back["type"], "Represented");
        assert_eq!(back["_id"], "ar1");
    }

    #[test]
    fn home_page_reads_camel_case_reference_lists() {
        let json = r#"{
            "_id": "home",
            "introTitle": "Welcome",
            "carouselArtworks": [{"_model": "artwork", "_id": "aw1"}],
            "heroCarousel": [{"heroCarouselTitle": "Spring", "heroCarouselUrl": "/en/spring"}]
        }"#;

        let home: HomePage = serde_json::from_str(json).expect("home decodes");
        assert_eq!(home.intro_title, "Welcome");
        assert_eq!(home.carousel_artworks, vec![Reference::new("artwork", "aw1")]);
        assert!(home.carousel_artists.is_empty());
        assert_eq!(home.hero_carousel[0].hero_carousel_url, "/en/spring");
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let artist: Artist =
            serde_json::from_str(r#"{"_id": "n1", "name": null, "type": null, "slug": null}"#)
                .expect("artist decodes");
        assert_eq!(artist.kind, "");
        assert_eq!(artist.name, "");

        let exhibition: Exhibition = serde_json::from_str(
            r#"{"_id": "ex1", "title": "Spring", "start_date": null, "end_date": null}"#,
        )
        .expect("exhibition decodes");
        assert_eq!(exhibition.title, "Spring");
        assert!(exhibition.end_date.is_empty());

        let achievement: Achievement =
            serde_json::from_str(r#"{"category": null, "year": null, "title": "A"}"#)
                .expect("achievement decodes");
        assert_eq!(achievement.year, 0);
        assert_eq!(achievement.category, "");
    }
}
