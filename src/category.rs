use crate::CollectorError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WeddingPlanners,
    Photographers,
    Videographers,
    Florists,
    Caterers,
    Venues,
    DjsAndBands,
    CakeDesigners,
    BridalShops,
    MakeupArtists,
    HairStylists,
    WeddingDecorators,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::WeddingPlanners,
        Category::Photographers,
        Category::Videographers,
        Category::Florists,
        Category::Caterers,
        Category::Venues,
        Category::DjsAndBands,
        Category::CakeDesigners,
        Category::BridalShops,
        Category::MakeupArtists,
        Category::HairStylists,
        Category::WeddingDecorators,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::WeddingPlanners => "wedding-planners",
            Category::Photographers => "photographers",
            Category::Videographers => "videographers",
            Category::Florists => "florists",
            Category::Caterers => "caterers",
            Category::Venues => "venues",
            Category::DjsAndBands => "djs-and-bands",
            Category::CakeDesigners => "cake-designers",
            Category::BridalShops => "bridal-shops",
            Category::MakeupArtists => "makeup-artists",
            Category::HairStylists => "hair-stylists",
            Category::WeddingDecorators => "wedding-decorators",
        }
    }

    /// Hashtag stems, most specific first.
    pub fn hashtag_keywords(&self) -> &'static [&'static str] {
        match self {
            Category::WeddingPlanners => &[
                "weddingplanner",
                "eventplanner",
                "weddingcoordinator",
                "bridalplanning",
            ],
            Category::Photographers => &[
                "weddingphotographer",
                "bridalphotography",
                "engagementphotos",
                "weddingphotos",
            ],
            Category::Videographers => &[
                "weddingvideographer",
                "weddingfilm",
                "cinematicwedding",
                "weddingvideo",
            ],
            Category::Florists => &[
                "weddingflorist",
                "bridalflowers",
                "weddingbouquet",
                "weddingflowers",
            ],
            Category::Caterers => &[
                "weddingcatering",
                "weddingfood",
                "receptioncatering",
                "weddingmenu",
            ],
            Category::Venues => &[
                "weddingvenue",
                "receptionvenue",
                "ceremonyvenue",
                "weddingvenues",
            ],
            Category::DjsAndBands => &[
                "weddingdj",
                "weddingband",
                "receptionmusic",
                "weddingentertainment",
            ],
            Category::CakeDesigners => &[
                "weddingcakes",
                "customcakes",
                "bridalcakes",
                "weddingdesserts",
            ],
            Category::BridalShops => &[
                "bridalshop",
                "weddingdress",
                "bridalgown",
                "bridalfashion",
            ],
            Category::MakeupArtists => &[
                "bridalmakeup",
                "weddingmakeup",
                "bridalbeauty",
                "makeupartist",
            ],
            Category::HairStylists => &[
                "bridalhair",
                "weddinghair",
                "bridalhairstylist",
                "weddinghairstylist",
            ],
            Category::WeddingDecorators => &[
                "weddingdecor",
                "ceremonydecorations",
                "receptiondecor",
                "weddingdesign",
            ],
        }
    }

    /// Bio terms that mark an account as a business of this kind.
    pub fn business_terms(&self) -> &'static [&'static str] {
        match self {
            Category::WeddingPlanners => &["planning", "coordinator", "coordination", "event", "planner"],
            Category::Photographers => &["photographer", "photography", "photo", "capture", "portraits"],
            Category::Videographers => &["videographer", "videography", "film", "cinema", "video"],
            Category::Florists => &["florist", "flowers", "floral", "bouquet", "arrangements"],
            Category::Caterers => &["catering", "caterer", "food", "chef", "menu"],
            Category::Venues => &["venue", "location", "space", "hall", "reception"],
            Category::DjsAndBands => &["dj", "band", "music", "entertainment", "live music"],
            Category::CakeDesigners => &["cake", "bakery", "dessert", "baker", "custom cakes"],
            Category::BridalShops => &["bridal", "dress", "gown", "boutique", "attire"],
            Category::MakeupArtists => &["makeup artist", "mua", "beauty", "cosmetics", "glam"],
            Category::HairStylists => &["hair stylist", "hairstylist", "updo", "bridal hair", "styling"],
            Category::WeddingDecorators => &["decorator", "decor", "design", "styling", "installations"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(CollectorError::UnknownCategory(s))
    }
}
