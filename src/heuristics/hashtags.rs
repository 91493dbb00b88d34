use super::location::state_name;
use crate::Category;
use itertools::Itertools;

pub const DEFAULT_HASHTAG_LIMIT: usize = 10;

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Hashtags (without `#`) for one city/category search.
///
/// City- and state-prefixed variants of the top three category keywords
/// come first, then the bare keywords, then generic wedding tags.
pub fn hashtags_for(city: &str, state: &str, category: Category, limit: usize) -> Vec<String> {
    let city = squash(city);
    let state = squash(state);
    let keywords = category.hashtag_keywords();

    let local = keywords
        .iter()
        .take(3)
        .flat_map(|kw| [format!("{}{}", city, kw), format!("{}{}", state, kw)]);
    let general = keywords.iter().take(4).map(ToString::to_string);
    let wedding = ["wedding", "bridal", "bride"]
        .into_iter()
        .map(ToString::to_string)
        .chain(std::iter::once(format!("{}wedding", city)));

    local
        .chain(general)
        .chain(wedding)
        .unique()
        .take(limit)
        .collect()
}

/// Hashtags for finding accounts near an already known vendor: local
/// wedding and vendor tags for its city and state, then the category's
/// top keywords. A state code is spelled out (`TX` gives `texaswedding`).
pub fn contextual_hashtags(
    city: Option<&str>,
    state: Option<&str>,
    category: Category,
    limit: usize,
) -> Vec<String> {
    let city_tags = city.map(squash).filter(|c| !c.is_empty()).map(|c| {
        vec![
            format!("{}wedding", c),
            format!("{}vendor", c),
            format!("{}weddingvendor", c),
        ]
    });
    let state_tags = state
        .map(|s| squash(state_name(s).unwrap_or(s)))
        .filter(|s| !s.is_empty())
        .map(|s| vec![format!("{}wedding", s), format!("{}vendor", s)]);

    city_tags
        .into_iter()
        .flatten()
        .chain(state_tags.into_iter().flatten())
        .chain(category.hashtag_keywords().iter().take(3).map(ToString::to_string))
        .unique()
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn local_tags_come_first() {
        let tags = hashtags_for("San Antonio", "TX", Category::Florists, DEFAULT_HASHTAG_LIMIT);
        assert_eq!(
            tags,
            vec![
                "sanantonioweddingflorist",
                "txweddingflorist",
                "sanantoniobridalflowers",
                "txbridalflowers",
                "sanantonioweddingbouquet",
                "txweddingbouquet",
                "weddingflorist",
                "bridalflowers",
                "weddingbouquet",
                "weddingflowers",
            ]
        );
    }

    #[test]
    fn larger_limit_adds_generic_tags() {
        let tags = hashtags_for("St. Louis", "MO", Category::Venues, 20);
        assert_eq!(tags.len(), 14);
        assert_eq!(tags[0], "stlouisweddingvenue");
        assert_eq!(tags.last().map(String::as_str), Some("stlouiswedding"));
    }

    #[test]
    fn contextual_tags_follow_known_location() {
        assert_eq!(
            contextual_hashtags(Some("Dallas"), Some("TX"), Category::Florists, 8),
            vec![
                "dallaswedding",
                "dallasvendor",
                "dallasweddingvendor",
                "texaswedding",
                "texasvendor",
                "weddingflorist",
                "bridalflowers",
                "weddingbouquet",
            ]
        );
        assert_eq!(
            contextual_hashtags(None, Some("NC"), Category::Venues, 2),
            vec!["northcarolinawedding", "northcarolinavendor"]
        );
        assert_eq!(
            contextual_hashtags(None, None, Category::Florists, 8),
            vec!["weddingflorist", "bridalflowers", "weddingbouquet"]
        );
    }
}
