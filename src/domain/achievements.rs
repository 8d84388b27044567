//! Achievement grouping for artist pages.

use std::collections::BTreeMap;

use ikono_cms_types::{Achievement, Artist};

/// `category → year → achievements`, each bucket in the artist's original order.
pub type AchievementsByCategory = BTreeMap<String, BTreeMap<i32, Vec<Achievement>>>;

pub fn group_by_category_and_year(artist: &Artist) -> AchievementsByCategory {
    let mut grouped = AchievementsByCategory::new();
    for achievement in artist.achievements.iter().flatten() {
        grouped
            .entry(achievement.category.clone())
            .or_default()
            .entry(achievement.year)
            .or_default()
            .push(achievement.clone());
    }
    grouped
}
