use crate::{heuristics, store::VendorStore, vendor::VendorRecord, Category, CollectorError};
use serde::Deserialize;
use std::{fmt, path::Path};
use tracing::{error, info, warn};

const ESTIMATED_POSTS: i64 = 100;

/// A hand-curated vendor, stored without scraping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedVendor {
    pub category: Category,
    pub handle: String,
    pub business_name: String,
    pub bio: String,
    pub estimated_followers: i64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl SeedVendor {
    fn dallas(
        category: Category,
        handle: &str,
        business_name: &str,
        bio: &str,
        estimated_followers: i64,
    ) -> SeedVendor {
        SeedVendor {
            category,
            handle: handle.to_string(),
            business_name: business_name.to_string(),
            bio: bio.to_string(),
            estimated_followers,
            city: Some("Dallas".to_string()),
            state: Some("TX".to_string()),
        }
    }

    /// The record to store. Missing location and contact details are
    /// taken from the bio.
    pub fn to_record(&self) -> VendorRecord {
        let (bio_city, bio_state) = heuristics::extract_location(&self.bio);
        let (email, phone) = heuristics::extract_contact(&self.bio);

        let mut record = VendorRecord::new(&self.handle, self.category).with_bio(&self.bio);
        record.business_name = Some(self.business_name.clone());
        record.subcategory =
            heuristics::subcategory(&self.bio, self.category).map(ToString::to_string);
        record.email = email;
        record.phone = phone;
        record.follower_count = self.estimated_followers;
        record.post_count = ESTIMATED_POSTS;
        record.is_business_account = true;
        record.city = self.city.clone().or(bio_city);
        record.state = self.state.clone().or(bio_state);
        record
    }
}

lazy_static::lazy_static! {
    pub static ref DALLAS_LOCAL_VENDORS: Vec<SeedVendor> = vec![
        SeedVendor::dallas(
            Category::Photographers,
            "amychristinaphotography",
            "Amy Christina Photography",
            "Dallas Wedding & Portrait Photographer | Serving DFW Metroplex",
            2500,
        ),
        SeedVendor::dallas(
            Category::Photographers,
            "brittanybarclayphotography",
            "Brittany Barclay Photography",
            "Dallas Wedding Photographer | Natural Light | Available for Travel",
            1800,
        ),
        SeedVendor::dallas(
            Category::Photographers,
            "jenniferdavisphotography",
            "Jennifer Davis Photography",
            "Dallas Wedding & Engagement Photographer | 10+ Years Experience",
            3200,
        ),
        SeedVendor::dallas(
            Category::MakeupArtists,
            "beautybylindsayj",
            "Beauty by Lindsay J",
            "Dallas Bridal Makeup Artist | Airbrush Specialist | On-location Services",
            950,
        ),
        SeedVendor::dallas(
            Category::MakeupArtists,
            "glammakeupbyash",
            "Glam Makeup by Ash",
            "Dallas MUA | Bridal & Special Events | Book now!",
            1200,
        ),
        SeedVendor::dallas(
            Category::HairStylists,
            "bridalhairbyjess",
            "Bridal Hair by Jess",
            "Dallas Hair Stylist | Bridal Updos | Serving DFW Area",
            850,
        ),
        SeedVendor::dallas(
            Category::HairStylists,
            "texashairandmakeup",
            "Texas Hair and Makeup",
            "Dallas Bridal Hair & Makeup Team | Licensed Cosmetologists",
            1500,
        ),
        SeedVendor::dallas(
            Category::WeddingPlanners,
            "shestudiosevents",
            "She Studios Events",
            "Dallas Wedding Planning & Design | Full Service | Luxury Events",
            2800,
        ),
        SeedVendor::dallas(
            Category::WeddingPlanners,
            "lovelyplanning",
            "Lovely Planning",
            "Dallas Wedding Planner | Coordination & Design Services",
            1600,
        ),
        SeedVendor::dallas(
            Category::Florists,
            "twigandcotton",
            "Twig and Cotton",
            "Dallas Wedding Florist | Custom Arrangements | Serving DFW",
            2200,
        ),
        SeedVendor::dallas(
            Category::Florists,
            "bloomsdallas",
            "Blooms Dallas",
            "Dallas Floral Design | Wedding & Event Flowers | Local Delivery",
            1400,
        ),
    ];
}

/// Accounts whose profile details seed collection for a category.
pub fn seed_handles(category: Category) -> &'static [&'static str] {
    match category {
        Category::MakeupArtists => &[
            "makeupbyariel",
            "makeupbyjenny",
            "charlottechampagne",
            "hinasharkawi",
            "dontcallmesarah",
        ],
        Category::HairStylists => &[
            "bridalhairandmakeup",
            "bridalhairdesign",
            "jenatkinhair",
            "chrismcmillanhair",
            "paulateschuk",
        ],
        Category::Photographers => &[
            "jordanhammond",
            "jenhuangphoto",
            "bradengunem",
            "sonyakhegay",
            "bethandjacob",
            "the_nickdacostas",
            "photobyjess",
            "rayofsunshinephotography",
        ],
        Category::WeddingPlanners => &[
            "joyproctor",
            "kristinlavoieplanning",
            "ashleydouglasevents",
            "jenniferlauradesign",
            "coordinatedbykristina",
        ],
        Category::Florists => &[
            "wildflowersinc",
            "theflowergirls",
            "petalsandposies",
            "bloomdesigns",
            "floralartistry",
        ],
        Category::Venues => &[
            "brooklynbotanicgarden",
            "weddingchicks",
            "greenweddingshoes",
            "oncewed",
            "junebugweddings",
        ],
        Category::Videographers => &[
            "stillmotion",
            "mattwalkerfilm",
            "revellerweddings",
            "forloveandalways",
            "nathanielweddings",
            "theweddingfilmco",
        ],
        Category::Caterers => &[
            "tastecatering",
            "gourmetcatering",
            "artisancatering",
            "custommenus",
        ],
        Category::DjsAndBands => &[
            "weddingdj",
            "weddingband",
            "receptionmusic",
            "weddingentertainment",
        ],
        Category::CakeDesigners => &[
            "customcakes",
            "weddingcakes",
            "cakeartistry",
            "cakesbyjill",
            "charmcitycakes",
        ],
        Category::BridalShops => &[
            "kleinfeld",
            "davidsbridalofficial",
            "bhldn",
            "pronovias",
            "maggiesottero",
            "allurebridal",
        ],
        Category::WeddingDecorators => &[
            "weddingdecor",
            "ceremonydecorations",
            "receptiondecor",
            "weddingstyling",
        ],
    }
}

/// Reads a JSON array of seed vendors.
pub async fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<SeedVendor>, CollectorError> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub added: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added   : {}", self.added)?;
        writeln!(f, "Skipped : {} (already stored)", self.skipped)?;
        writeln!(f, "Failed  : {}", self.failed)
    }
}

/// Stores every seed not already present under its category. A seed that
/// cannot be stored is logged and counted as failed.
pub async fn populate<S>(store: &S, seeds: &[SeedVendor]) -> Result<SeedReport, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let mut report = SeedReport::default();

    for seed in seeds {
        let record = seed.to_record();
        match store.get_vendor(&record.handle, record.category).await {
            Ok(Some(_)) => {
                warn!("@{} already exists in {}, skipping", record.handle, record.category);
                report.skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Error checking @{}: {}", record.handle, e);
                report.failed += 1;
                continue;
            }
        }

        match store.upsert_vendor(&record).await {
            Ok(()) => {
                info!(
                    "Added @{} - {} ({})",
                    record.handle, seed.business_name, record.category
                );
                report.added += 1;
            }
            Err(e) => {
                error!("Error adding @{}: {}", record.handle, e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
