use crate::{utils, Category};

const MAX_NAME_CHARS: usize = 50;

fn usable_name(line: &str) -> Option<&str> {
    let line = line.trim();
    let usable = !line.is_empty()
        && line.chars().count() < MAX_NAME_CHARS
        && !line.starts_with('@')
        && !line.starts_with('#')
        && !line.starts_with("http");
    usable.then_some(line)
}

/// Picks a display name: the profile's full name, else the first usable
/// bio line, else the handle title-cased.
pub fn business_name(full_name: Option<&str>, bio: &str, handle: &str) -> String {
    full_name
        .map(str::trim)
        .filter(|n| !n.is_empty() && n.chars().count() < MAX_NAME_CHARS)
        .or_else(|| bio.lines().find_map(usable_name))
        .map(ToString::to_string)
        .unwrap_or_else(|| utils::title_case(handle))
}

type SubcategoryRules = &'static [(&'static str, &'static [&'static str])];

fn rules(category: Category) -> SubcategoryRules {
    match category {
        Category::MakeupArtists => &[
            ("airbrush-specialist", &["airbrush", "hd makeup", "hd foundation"]),
            ("natural-makeup", &["natural", "organic", "clean beauty"]),
            ("glam-specialist", &["glam", "glamour", "dramatic"]),
            (
                "cultural-specialist",
                &["traditional", "cultural", "asian", "indian", "mexican"],
            ),
        ],
        Category::HairStylists => &[
            ("updo-specialist", &["updo", "updos", "bridal updo"]),
            ("extensions-specialist", &["extensions", "hair extensions"]),
            ("color-specialist", &["color", "colorist", "balayage"]),
            (
                "textured-hair-specialist",
                &["natural hair", "textured hair", "curly"],
            ),
        ],
        Category::Photographers => &[
            ("engagement-photography", &["engagement", "couple", "proposal"]),
            ("portrait-photography", &["portrait", "headshot", "family"]),
            ("destination-photography", &["destination", "travel", "elopement"]),
            ("fine-art-photography", &["fine art", "artistic", "editorial"]),
        ],
        Category::Venues => &[
            ("outdoor-venues", &["outdoor", "garden", "barn", "farm", "beach"]),
            ("indoor-venues", &["ballroom", "hotel", "historic", "hall"]),
            ("destination-venues", &["destination", "resort", "winery", "vineyard"]),
        ],
        Category::Caterers => &[
            (
                "full-service-catering",
                &["full service", "complete", "all inclusive"],
            ),
            (
                "specialty-cuisine",
                &["italian", "mexican", "asian", "mediterranean"],
            ),
            ("dessert-catering", &["dessert", "sweet", "cake", "pastry"]),
        ],
        _ => &[],
    }
}

pub fn subcategory(bio: &str, category: Category) -> Option<&'static str> {
    let bio = bio.to_lowercase();
    rules(category)
        .iter()
        .find(|(_, words)| words.iter().any(|w| bio.contains(w)))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_full_name() {
        assert_eq!(
            business_name(Some(" Faces by Brittany "), "Dallas MUA", "facesbybrittany"),
            "Faces by Brittany"
        );
    }

    #[test]
    fn falls_back_to_bio_line() {
        let bio = "@partner_account\n#dallasweddings\nhttps://link.bio\nBlush Beauty Dallas\nBook now";
        assert_eq!(business_name(Some(""), bio, "blush"), "Blush Beauty Dallas");
    }

    #[test]
    fn long_names_are_rejected() {
        let long = "A".repeat(60);
        assert_eq!(
            business_name(Some(&long), &long, "hair_by.christine"),
            "Hair By Christine"
        );
    }

    #[test]
    fn subcategories() {
        assert_eq!(
            subcategory("Dallas MUA | Airbrush makeup", Category::MakeupArtists),
            Some("airbrush-specialist")
        );
        assert_eq!(
            subcategory("Bridal UPDOS and more", Category::HairStylists),
            Some("updo-specialist")
        );
        assert_eq!(
            subcategory("Rustic barn on 40 acres", Category::Venues),
            Some("outdoor-venues")
        );
        assert_eq!(
            subcategory("Custom wedding cakes", Category::CakeDesigners),
            None
        );
        assert_eq!(subcategory("", Category::Photographers), None);
    }
}
