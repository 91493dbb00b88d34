//! Read-mostly maintenance over the vendor directory: coverage, URL and
//! profile image reports, repairs, handle verification, targeted removal
//! and per-category counts.

use crate::{
    instagram::{self, ProfileChecker},
    markets::Market,
    store::{VendorFilter, VendorStore},
    vendor::{instagram_url, normalize_handle},
    Category, CollectorError,
};
use futures::future::{join_all, try_join_all};
use std::{fmt, time::Duration};
use tracing::{error, info, warn};

pub const DEFAULT_COVERAGE_GOAL: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageStatus {
    Complete,
    Halfway,
    Started,
    Empty,
}

impl CoverageStatus {
    pub fn classify(count: u32, goal: u32) -> CoverageStatus {
        if count >= goal {
            CoverageStatus::Complete
        } else if count >= goal / 2 && count > 0 {
            CoverageStatus::Halfway
        } else if count >= 1 {
            CoverageStatus::Started
        } else {
            CoverageStatus::Empty
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCoverage {
    pub city: String,
    pub state: String,
    pub count: u32,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCoverage {
    pub category: Category,
    /// Highest count first.
    pub cities: Vec<CityCoverage>,
    /// Vendors in the category across every location.
    pub stored_total: u32,
}

impl CategoryCoverage {
    pub fn city_total(&self) -> u32 {
        self.cities.iter().map(|c| c.count).sum()
    }

    pub fn complete_cities(&self) -> u32 {
        self.cities
            .iter()
            .filter(|c| c.status == CoverageStatus::Complete)
            .count() as u32
    }

    pub fn completion_rate(&self) -> f64 {
        if self.cities.is_empty() {
            return 0.0;
        }
        f64::from(self.complete_cities()) * 100.0 / self.cities.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub goal: u32,
    pub categories: Vec<CategoryCoverage>,
}

impl CoverageReport {
    pub fn combinations(&self) -> u32 {
        self.categories.iter().map(|c| c.cities.len() as u32).sum()
    }

    pub fn complete_combinations(&self) -> u32 {
        self.categories.iter().map(|c| c.complete_cities()).sum()
    }

    pub fn total_vendors(&self) -> u32 {
        self.categories.iter().map(|c| c.city_total()).sum()
    }

    pub fn target(&self) -> u32 {
        self.combinations() * self.goal
    }

    pub fn still_needed(&self) -> u32 {
        self.target().saturating_sub(self.total_vendors())
    }

    /// Categories ordered from best to worst city completion.
    pub fn ranked(&self) -> Vec<&CategoryCoverage> {
        let mut ranked: Vec<&CategoryCoverage> = self.categories.iter().collect();
        ranked.sort_by(|a, b| {
            b.completion_rate()
                .total_cmp(&a.completion_rate())
                .then(b.stored_total.cmp(&a.stored_total))
        });
        ranked
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Goal: {} vendors per city per category", self.goal)?;

        for category in &self.categories {
            writeln!(f)?;
            writeln!(f, "{}", category.category.as_str().to_uppercase())?;
            writeln!(f, "  Category total : {}", category.city_total())?;
            writeln!(
                f,
                "  Cities at goal : {}/{} ({:.1}%)",
                category.complete_cities(),
                category.cities.len(),
                category.completion_rate()
            )?;
            for city in &category.cities {
                let status = match city.status {
                    CoverageStatus::Complete => "complete".to_string(),
                    CoverageStatus::Halfway | CoverageStatus::Started => {
                        format!("{}/{}, need {}", city.count, self.goal, self.goal - city.count)
                    }
                    CoverageStatus::Empty => format!("0/{}", self.goal),
                };
                writeln!(f, "    {}, {}: {}", city.city, city.state, status)?;
            }
        }

        let combinations = self.combinations();
        let rate = if combinations == 0 {
            0.0
        } else {
            f64::from(self.complete_combinations()) * 100.0 / f64::from(combinations)
        };
        writeln!(f)?;
        writeln!(f, "Total vendors : {}", self.total_vendors())?;
        writeln!(
            f,
            "Combinations  : {}/{} complete ({:.1}%)",
            self.complete_combinations(),
            combinations,
            rate
        )?;
        writeln!(f, "Target        : {}", self.target())?;
        writeln!(f, "Still needed  : {}", self.still_needed())?;

        let ranked = self.ranked();
        writeln!(f)?;
        writeln!(f, "Best covered:")?;
        for c in ranked.iter().take(3) {
            writeln!(
                f,
                "  {}: {:.1}% of cities, {} vendors",
                c.category,
                c.completion_rate(),
                c.stored_total
            )?;
        }
        writeln!(f, "Needing attention:")?;
        for c in ranked.iter().rev().take(3) {
            writeln!(
                f,
                "  {}: {:.1}% of cities, {} vendors",
                c.category,
                c.completion_rate(),
                c.stored_total
            )?;
        }
        Ok(())
    }
}

/// Vendor counts for every (category, city) pair. A count that cannot be
/// read is logged and reported as zero.
pub async fn coverage_report<S>(
    store: &S,
    cities: &[Market],
    categories: &[Category],
    goal: u32,
) -> Result<CoverageReport, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let mut report = CoverageReport {
        goal,
        categories: Vec::with_capacity(categories.len()),
    };

    for &category in categories {
        let counts = join_all(cities.iter().map(|&(city, state)| async move {
            let filter = VendorFilter::category(category).in_city(city, state);
            match store.count(&filter).await {
                Ok(count) => count,
                Err(e) => {
                    error!("Error checking {}, {} for {}: {}", city, state, category, e);
                    0
                }
            }
        }))
        .await;

        let mut city_coverage: Vec<CityCoverage> = cities
            .iter()
            .zip(counts)
            .map(|(&(city, state), count)| CityCoverage {
                city: city.to_string(),
                state: state.to_string(),
                count,
                status: CoverageStatus::classify(count, goal),
            })
            .collect();
        city_coverage.sort_by(|a, b| b.count.cmp(&a.count));

        report.categories.push(CategoryCoverage {
            category,
            cities: city_coverage,
            stored_total: store.count(&VendorFilter::category(category)).await?,
        });
    }

    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlReport {
    pub total: usize,
    pub www: usize,
    pub bare: usize,
    pub plain_http: usize,
    pub empty: usize,
    /// (handle, url) pairs that are not Instagram links.
    pub invalid: Vec<(String, String)>,
    /// (handle, username found in the url) pairs that disagree.
    pub mismatches: Vec<(String, String)>,
}

impl UrlReport {
    pub fn valid(&self) -> usize {
        self.www + self.bare + self.plain_http
    }
}

impl fmt::Display for UrlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instagram URL analysis ({} records)", self.total)?;
        writeln!(f, "  Valid          : {}", self.valid())?;
        writeln!(f, "    https://www. : {}", self.www)?;
        writeln!(f, "    https://     : {}", self.bare)?;
        writeln!(f, "    http://      : {}", self.plain_http)?;
        writeln!(f, "  Empty/missing  : {}", self.empty)?;
        writeln!(f, "  Invalid        : {}", self.invalid.len())?;
        for (handle, url) in &self.invalid {
            writeln!(f, "    @{}: {}", handle, url)?;
        }
        if self.mismatches.is_empty() {
            writeln!(f, "All handles match their URL usernames")?;
        } else {
            writeln!(f, "Handle/URL mismatches: {}", self.mismatches.len())?;
            for (handle, username) in &self.mismatches {
                writeln!(f, "    @{} vs {}", handle, username)?;
            }
        }
        Ok(())
    }
}

pub async fn url_report<S>(store: &S) -> Result<UrlReport, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let vendors = store.find(&VendorFilter::all()).await?;
    let mut report = UrlReport {
        total: vendors.len(),
        ..Default::default()
    };

    for vendor in vendors {
        let url = vendor.instagram_url.as_deref().map(str::trim).unwrap_or_default();
        if url.is_empty() {
            report.empty += 1;
            continue;
        } else if url.starts_with("https://www.instagram.com/") {
            report.www += 1;
        } else if url.starts_with("https://instagram.com/") {
            report.bare += 1;
        } else if url.starts_with("http://") {
            report.plain_http += 1;
        } else {
            report.invalid.push((vendor.handle, url.to_string()));
            continue;
        }

        if url.contains("instagram.com/") {
            let username = normalize_handle(url);
            if username != vendor.handle {
                report.mismatches.push((vendor.handle, username));
            }
        }
    }

    Ok(report)
}

/// Gives every record without an Instagram URL the canonical one built
/// from its handle. Returns how many were updated.
pub async fn fix_instagram_urls<S>(store: &S) -> Result<u32, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let missing = store.missing_instagram_url().await?;
    if missing.is_empty() {
        info!("All vendors already have Instagram URLs");
        return Ok(0);
    }
    info!("Found {} vendors missing Instagram URLs", missing.len());

    let mut fixed = 0;
    for vendor in missing {
        let url = instagram_url(&vendor.handle);
        match store
            .set_instagram_url(&vendor.handle, vendor.category, &url)
            .await
        {
            Ok(true) => {
                info!("Fixed @{} -> {}", vendor.handle, url);
                fixed += 1;
            }
            Ok(false) => warn!("@{} disappeared before it could be fixed", vendor.handle),
            Err(e) => error!("Error updating @{}: {}", vendor.handle, e),
        }
    }
    Ok(fixed)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageReport {
    pub total: usize,
    pub with_image: usize,
    /// (category, handle) of the records still without one.
    pub missing: Vec<(Category, String)>,
}

impl ImageReport {
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.with_image as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profile images ({} records)", self.total)?;
        writeln!(f, "  With image    : {}", self.with_image)?;
        writeln!(f, "  Without image : {}", self.missing.len())?;
        writeln!(f, "  Coverage      : {:.1}%", self.coverage())?;
        for (category, handle) in &self.missing {
            writeln!(f, "    @{} ({})", handle, category)?;
        }
        Ok(())
    }
}

pub async fn image_report<S>(store: &S, filter: &VendorFilter) -> Result<ImageReport, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let vendors = store.find(filter).await?;
    let mut report = ImageReport {
        total: vendors.len(),
        ..Default::default()
    };
    for vendor in vendors {
        match vendor.profile_image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => report.with_image += 1,
            _ => report.missing.push((vendor.category, vendor.handle)),
        }
    }
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBackfill {
    /// Images taken from freshly scraped profile details.
    pub scraped: u32,
    /// Records given the redirecting fallback URL.
    pub fallback: u32,
    pub failed: u32,
}

impl fmt::Display for ImageBackfill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scraped  : {}", self.scraped)?;
        writeln!(f, "Fallback : {}", self.fallback)?;
        writeln!(f, "Failed   : {}", self.failed)
    }
}

/// Gives up to `limit` records without a profile image the fallback URL
/// that redirects to their current picture.
pub async fn backfill_profile_images<S>(store: &S, limit: u32) -> Result<ImageBackfill, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let missing = store.missing_profile_image(limit).await?;
    if missing.is_empty() {
        info!("All vendors already have profile images");
        return Ok(ImageBackfill::default());
    }
    info!("Found {} vendors needing profile images", missing.len());

    let mut report = ImageBackfill::default();
    for vendor in missing {
        let url = instagram::fallback_profile_image(&vendor.handle);
        match store
            .set_profile_image(&vendor.handle, vendor.category, &url)
            .await
        {
            Ok(true) => {
                info!("@{} -> {}", vendor.handle, url);
                report.fallback += 1;
            }
            Ok(false) => warn!("@{} disappeared before it could be updated", vendor.handle),
            Err(e) => {
                error!("Error updating @{}: {}", vendor.handle, e);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub verified: Vec<(Category, String)>,
    /// Accounts whose profile page does not exist.
    pub invalid: Vec<(Category, String)>,
    /// Accounts that could not be checked.
    pub unchecked: Vec<(Category, String)>,
}

impl VerificationReport {
    pub fn checked(&self) -> usize {
        self.verified.len() + self.invalid.len()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verified  : {}", self.verified.len())?;
        writeln!(f, "Invalid   : {}", self.invalid.len())?;
        writeln!(f, "Unchecked : {}", self.unchecked.len())?;
        if self.checked() > 0 {
            writeln!(
                f,
                "Success rate: {:.1}%",
                self.verified.len() as f64 / self.checked() as f64 * 100.0
            )?;
        }
        for (category, handle) in &self.invalid {
            writeln!(f, "  invalid   @{} ({})", handle, category)?;
        }
        for (category, handle) in &self.unchecked {
            writeln!(f, "  unchecked @{} ({})", handle, category)?;
        }
        Ok(())
    }
}

/// Checks that every matching record's Instagram profile exists, waiting
/// `delay` between requests. Nothing is removed here.
pub async fn verify_handles<S, C>(
    store: &S,
    checker: &C,
    filter: &VendorFilter,
    delay: Duration,
) -> Result<VerificationReport, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
    C: ProfileChecker + Sync + ?Sized,
{
    let vendors = store.find(filter).await?;
    info!("Verifying {} vendors", vendors.len());

    let mut report = VerificationReport::default();
    for (i, vendor) in vendors.into_iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let entry = (vendor.category, vendor.handle);
        match checker.profile_exists(&entry.1).await {
            Ok(true) => {
                info!("@{} verified", entry.1);
                report.verified.push(entry);
            }
            Ok(false) => {
                warn!("@{} ({}) not found on Instagram", entry.1, entry.0);
                report.invalid.push(entry);
            }
            Err(e) => {
                error!("Error checking @{}: {}", entry.1, e);
                report.unchecked.push(entry);
            }
        }
    }
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<String>,
}

impl fmt::Display for RemovalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Removed   : {}", self.removed.len())?;
        for handle in &self.missing {
            writeln!(f, "Not found : @{}", handle)?;
        }
        for handle in &self.failed {
            writeln!(f, "Failed    : @{}", handle)?;
        }
        Ok(())
    }
}

pub async fn remove_handles<S, H>(
    store: &S,
    category: Category,
    handles: &[H],
) -> Result<RemovalReport, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
    H: AsRef<str>,
{
    let mut report = RemovalReport::default();
    for handle in handles.iter().map(|h| normalize_handle(h.as_ref())) {
        match store.delete_vendor(&handle, category).await {
            Ok(true) => {
                info!("Removed @{} from {}", handle, category);
                report.removed.push(handle);
            }
            Ok(false) => {
                warn!("@{} not found in {}", handle, category);
                report.missing.push(handle);
            }
            Err(e) => {
                error!("Error removing @{}: {}", handle, e);
                report.failed.push(handle);
            }
        }
    }
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub per_category: Vec<(Category, u32)>,
    pub total: u32,
}

impl fmt::Display for CategoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, count) in &self.per_category {
            writeln!(f, "{:<20} {:>6}", category.as_str(), count)?;
        }
        writeln!(f, "{:<20} {:>6}", "total", self.total)
    }
}

pub async fn category_stats<S>(store: &S) -> Result<CategoryStats, CollectorError>
where
    S: VendorStore + Sync + ?Sized,
{
    let per_category = try_join_all(Category::ALL.iter().map(|&category| async move {
        let filter = VendorFilter::category(category);
        store.count(&filter).await.map(|n| (category, n))
    }))
    .await?;
    let total = store.count(&VendorFilter::all()).await?;
    Ok(CategoryStats {
        per_category,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteVendorStore;
    use crate::vendor::VendorRecord;
    use pretty_assertions::assert_eq;

    macro_rules! upsert {
        ($store:expr, $($vendor:expr),+) => {
            $(
                $store.upsert_vendor(&$vendor).await.unwrap();
            )+
        };
    }

    fn located(handle: &str, category: Category, city: &str, state: &str) -> VendorRecord {
        let mut v = VendorRecord::new(handle, category);
        v.city = Some(city.to_string());
        v.state = Some(state.to_string());
        v
    }

    #[test]
    fn status_buckets() {
        assert_eq!(CoverageStatus::classify(20, 20), CoverageStatus::Complete);
        assert_eq!(CoverageStatus::classify(10, 20), CoverageStatus::Halfway);
        assert_eq!(CoverageStatus::classify(9, 20), CoverageStatus::Started);
        assert_eq!(CoverageStatus::classify(0, 20), CoverageStatus::Empty);
        assert_eq!(CoverageStatus::classify(0, 0), CoverageStatus::Complete);
    }

    #[tokio::test]
    async fn coverage_counts_each_city() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        upsert!(
            store,
            located("a", Category::Florists, "Dallas", "TX"),
            located("b", Category::Florists, "Dallas", "TX"),
            located("c", Category::Florists, "Austin", "TX"),
            located("d", Category::Florists, "Reno", "NV"),
            located("e", Category::Venues, "Dallas", "TX")
        );

        let cities = [("Austin", "TX"), ("Dallas", "TX"), ("Boston", "MA")];
        let report = coverage_report(&store, &cities, &[Category::Florists, Category::Venues], 2)
            .await
            .unwrap();

        let florists = &report.categories[0];
        assert_eq!(florists.category, Category::Florists);
        assert_eq!(
            florists
                .cities
                .iter()
                .map(|c| (c.city.as_str(), c.count, c.status))
                .collect::<Vec<_>>(),
            vec![
                ("Dallas", 2, CoverageStatus::Complete),
                ("Austin", 1, CoverageStatus::Halfway),
                ("Boston", 0, CoverageStatus::Empty),
            ]
        );
        assert_eq!(florists.city_total(), 3);
        assert_eq!(florists.stored_total, 4);

        assert_eq!(report.combinations(), 6);
        assert_eq!(report.complete_combinations(), 1);
        assert_eq!(report.total_vendors(), 4);
        assert_eq!(report.target(), 12);
        assert_eq!(report.still_needed(), 8);
        assert_eq!(report.ranked()[0].category, Category::Florists);

        let text = report.to_string();
        assert!(text.contains("FLORISTS"));
        assert!(text.contains("Austin, TX: 1/2, need 1"));
    }

    #[tokio::test]
    async fn url_audit_and_fix() {
        let store = SqliteVendorStore::in_memory().await.unwrap();

        let www = VendorRecord::new("www_ok", Category::Caterers);
        let mut bare = VendorRecord::new("bare_ok", Category::Caterers);
        bare.instagram_url = Some("https://instagram.com/bare_ok/".into());
        let mut http = VendorRecord::new("http_ok", Category::Caterers);
        http.instagram_url = Some("http://instagram.com/someoneelse".into());
        let mut invalid = VendorRecord::new("bad", Category::Caterers);
        invalid.instagram_url = Some("www.bad-link.example".into());
        let mut empty = VendorRecord::new("empty", Category::Caterers);
        empty.instagram_url = None;
        upsert!(store, www, bare, http, invalid, empty);

        let report = url_report(&store).await.unwrap();
        assert_eq!(report.total, 5);
        assert_eq!(report.valid(), 3);
        assert_eq!((report.www, report.bare, report.plain_http), (1, 1, 1));
        assert_eq!(report.empty, 1);
        assert_eq!(
            report.invalid,
            vec![("bad".to_string(), "www.bad-link.example".to_string())]
        );
        assert_eq!(
            report.mismatches,
            vec![("http_ok".to_string(), "someoneelse".to_string())]
        );

        assert_eq!(fix_instagram_urls(&store).await.unwrap(), 1);
        assert_eq!(fix_instagram_urls(&store).await.unwrap(), 0);
        let fixed = store
            .get_vendor("empty", Category::Caterers)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            fixed.instagram_url.as_deref(),
            Some("https://www.instagram.com/empty")
        );
    }

    #[tokio::test]
    async fn removes_listed_handles() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        upsert!(
            store,
            VendorRecord::new("wildflowerdallas", Category::Florists),
            VendorRecord::new("wildflowerdallas", Category::Venues)
        );

        let report = remove_handles(&store, Category::Florists, &["@WildflowerDallas", "ghost"])
            .await
            .unwrap();
        assert_eq!(report.removed, vec!["wildflowerdallas"]);
        assert_eq!(report.missing, vec!["ghost"]);
        assert!(report.failed.is_empty());
        assert!(store
            .get_vendor("wildflowerdallas", Category::Venues)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn image_report_and_backfill() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        let mut pictured = located("pictured", Category::Florists, "Dallas", "TX");
        pictured.profile_image_url = Some("https://cdn.example/p.jpg".into());
        upsert!(
            store,
            pictured,
            located("plain", Category::Florists, "Dallas", "TX"),
            located("elsewhere", Category::Florists, "Austin", "TX")
        );

        let dallas = VendorFilter::all().in_city("Dallas", "TX");
        let report = image_report(&store, &dallas).await.unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.with_image, 1);
        assert_eq!(report.missing, vec![(Category::Florists, "plain".to_string())]);
        assert_eq!(report.coverage(), 50.0);

        let filled = backfill_profile_images(&store, 10).await.unwrap();
        assert_eq!(
            filled,
            ImageBackfill {
                scraped: 0,
                fallback: 2,
                failed: 0
            }
        );
        let plain = store
            .get_vendor("plain", Category::Florists)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            plain.profile_image_url.as_deref(),
            Some("https://www.instagram.com/plain/picture/")
        );
        assert_eq!(image_report(&store, &VendorFilter::all()).await.unwrap().coverage(), 100.0);
        assert_eq!(backfill_profile_images(&store, 10).await.unwrap(), ImageBackfill::default());
    }

    struct KnownProfiles(&'static [&'static str]);

    #[async_trait::async_trait]
    impl ProfileChecker for KnownProfiles {
        async fn profile_exists(&self, handle: &str) -> Result<bool, CollectorError> {
            if handle == "timeout" {
                return Err(CollectorError::Config("timed out".into()));
            }
            Ok(self.0.contains(&handle))
        }
    }

    #[tokio::test]
    async fn verification_sorts_accounts() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        upsert!(
            store,
            located("twigandcotton", Category::Florists, "Dallas", "TX"),
            located("stemsofdallasflorist", Category::Florists, "Dallas", "TX"),
            located("timeout", Category::Venues, "Dallas", "TX"),
            located("austinonly", Category::Florists, "Austin", "TX")
        );

        let report = verify_handles(
            &store,
            &KnownProfiles(&["twigandcotton", "austinonly"]),
            &VendorFilter::all().in_city("Dallas", "TX"),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(
            report.verified,
            vec![(Category::Florists, "twigandcotton".to_string())]
        );
        assert_eq!(
            report.invalid,
            vec![(Category::Florists, "stemsofdallasflorist".to_string())]
        );
        assert_eq!(report.unchecked, vec![(Category::Venues, "timeout".to_string())]);
        assert_eq!(report.checked(), 2);
        assert!(report.to_string().contains("Success rate: 50.0%"));
        assert_eq!(store.count(&VendorFilter::all()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn stats_per_category() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        upsert!(
            store,
            VendorRecord::new("a", Category::Florists),
            VendorRecord::new("b", Category::Florists),
            VendorRecord::new("c", Category::BridalShops)
        );

        let stats = category_stats(&store).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.per_category.len(), 12);
        assert!(stats.per_category.contains(&(Category::Florists, 2)));
        assert!(stats.per_category.contains(&(Category::BridalShops, 1)));
        assert!(stats.per_category.contains(&(Category::Venues, 0)));
    }
}
