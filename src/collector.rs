use crate::{
    apify::{self, JobRun, JobService, PollSettings, ScraperInput},
    audit::ImageBackfill,
    heuristics, instagram,
    markets::Priority,
    profile::RawProfile,
    store::{RunOutcome, RunState, ScrapingRun, VendorFilter, VendorStore},
    vendor::VendorRecord,
    Category, CollectorError,
};
use itertools::Itertools;
use std::time::Duration;
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, error, info, warn};

const SWEEP_RESULTS_LIMIT: u32 = 100;
const MANUAL_RESULTS_LIMIT: u32 = 200;
const HASHTAG_SEARCH_LIMIT: u32 = 50;
const EXPANSION_RESULTS_LIMIT: u32 = 15;
const EXPANSION_SEARCH_LIMIT: u32 = 10;
const EXPANSION_HASHTAG_LIMIT: usize = 8;

pub const DEFAULT_PRIMARY_STATES: [&str; 10] =
    ["TX", "CA", "NY", "FL", "IL", "PA", "OH", "GA", "NC", "MI"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    pub quality_threshold: u8,
    pub seed_quality_threshold: u8,
    pub min_followers: i64,
    pub primary_states: Vec<String>,
    pub city_delay: Duration,
    pub profile_delay: Duration,
    pub category_delay: Duration,
    pub poll: PollSettings,
    pub seed_poll: PollSettings,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        CollectorSettings {
            quality_threshold: 4,
            seed_quality_threshold: 2,
            min_followers: 500,
            primary_states: DEFAULT_PRIMARY_STATES
                .iter()
                .map(ToString::to_string)
                .collect(),
            city_delay: Duration::from_secs(300),
            profile_delay: Duration::from_secs(30),
            category_delay: Duration::from_secs(120),
            poll: PollSettings::default(),
            seed_poll: PollSettings::default().with_timeout(Duration::from_secs(180)),
        }
    }
}

impl CollectorSettings {
    fn is_primary_state(&self, state: &str) -> bool {
        self.primary_states
            .iter()
            .any(|s| s.eq_ignore_ascii_case(state))
    }
}

/// How strictly scraped profiles are screened before being saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Hashtag discovery: quality threshold, follower floor and primary
    /// states all apply.
    Discovery,
    /// Curated seed accounts: only the lenient seed threshold applies.
    Seeded,
}

/// Keeps a minimum gap between the end of one remote job and the start
/// of the next.
struct Pacer {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    fn new(delay: Duration) -> Pacer {
        Pacer {
            delay,
            last: Mutex::new(None),
        }
    }

    async fn wait(&self) {
        let last = *self.last.lock().await;
        if let Some(last) = last {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                debug!("Waiting {:?} before the next job", self.delay - elapsed);
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
    }

    async fn mark(&self) {
        self.last.lock().await.replace(Instant::now());
    }
}

struct Candidate<'a> {
    profile: &'a RawProfile,
    handle: String,
    score: u8,
    city: Option<String>,
    state: Option<String>,
}

/// Location from the bio, completed from the profile's tagged location.
fn profile_location(profile: &RawProfile) -> (Option<String>, Option<String>) {
    let (city, state) = heuristics::extract_location(profile.bio());
    if city.is_some() && state.is_some() {
        return (city, state);
    }
    match profile.location_name() {
        Some(name) => {
            let (tagged_city, tagged_state) = heuristics::extract_location(name);
            (city.or(tagged_city), state.or(tagged_state))
        }
        None => (city, state),
    }
}

/// Builds the directory record for a scraped profile.
pub fn vendor_from_profile(
    profile: &RawProfile,
    handle: &str,
    category: Category,
    city: Option<String>,
    state: Option<String>,
) -> VendorRecord {
    let bio = profile.bio();
    let (email, phone) = heuristics::extract_contact(bio);

    let mut record = VendorRecord::new(handle, category).with_bio(bio);
    record.business_name = Some(heuristics::business_name(
        profile.full_name(),
        bio,
        &record.handle,
    ));
    record.subcategory = heuristics::subcategory(bio, category).map(ToString::to_string);
    record.website_url = profile.external_url().map(ToString::to_string);
    record.email = email;
    record.phone = phone;
    record.follower_count = profile.followers();
    record.post_count = profile.posts();
    record.is_verified = profile.is_verified();
    record.is_business_account = profile.is_business_account();
    record.profile_image_url = profile.profile_pic_url().map(ToString::to_string);
    record.city = city;
    record.state = state;
    record
}

pub struct Collector<J, S> {
    service: J,
    store: S,
    settings: CollectorSettings,
    city_pacer: Pacer,
    profile_pacer: Pacer,
    category_pacer: Pacer,
}

impl<J, S> Collector<J, S>
where
    J: JobService + Sync,
    S: VendorStore + Sync,
{
    pub fn new(service: J, store: S, settings: CollectorSettings) -> Collector<J, S> {
        Collector {
            city_pacer: Pacer::new(settings.city_delay),
            profile_pacer: Pacer::new(settings.profile_delay),
            category_pacer: Pacer::new(settings.category_delay),
            service,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn service(&self) -> &J {
        &self.service
    }

    /// Screens, ranks and saves scraped profiles; returns how many were
    /// saved. Profiles already stored under `category` are skipped, and a
    /// profile that fails to save is logged and skipped.
    pub async fn process_profiles(
        &self,
        profiles: &[RawProfile],
        category: Category,
        context: &str,
        max_results: usize,
        mode: ScoringMode,
    ) -> Result<u32, CollectorError> {
        let mut existing = self.store.existing_handles(category).await?;
        let threshold = match mode {
            ScoringMode::Discovery => self.settings.quality_threshold,
            ScoringMode::Seeded => self.settings.seed_quality_threshold,
        };

        let candidates: Vec<Candidate> = profiles
            .iter()
            .filter(|p| !p.is_error())
            .filter_map(|p| p.handle().map(|handle| (p, handle)))
            .filter(|(_, handle)| !existing.contains(handle))
            .filter_map(|(profile, handle)| {
                let score = heuristics::quality_score(profile, category);
                if score < threshold {
                    return None;
                }
                let (city, state) = profile_location(profile);
                if mode == ScoringMode::Discovery {
                    if profile.followers() < self.settings.min_followers {
                        return None;
                    }
                    if let Some(state) = &state {
                        if !self.settings.is_primary_state(state) {
                            return None;
                        }
                    }
                }
                Some(Candidate {
                    profile,
                    handle,
                    score,
                    city,
                    state,
                })
            })
            .sorted_by(|a, b| {
                (b.score, b.profile.followers()).cmp(&(a.score, a.profile.followers()))
            })
            .collect();

        debug!(
            "{}: {} of {} profiles passed screening for {}",
            context,
            candidates.len(),
            profiles.len(),
            category
        );

        let mut saved = 0;
        for candidate in candidates {
            if saved as usize >= max_results {
                break;
            }
            if existing.contains(&candidate.handle) {
                continue;
            }

            let record = vendor_from_profile(
                candidate.profile,
                &candidate.handle,
                category,
                candidate.city,
                candidate.state,
            );
            match self.store.upsert_vendor(&record).await {
                Ok(()) => {
                    saved += 1;
                    info!(
                        "[{}] Saved @{} as {} (score {})",
                        saved, record.handle, category, candidate.score
                    );
                    existing.insert(candidate.handle);
                }
                Err(e) => error!("Error saving @{} from {}: {}", candidate.handle, context, e),
            }
        }

        Ok(saved)
    }

    /// Runs one hashtag job end to end, book-keeping it in the run table.
    async fn run_hashtag_job(
        &self,
        category: Category,
        location: &str,
        input: &ScraperInput,
        max_results: usize,
    ) -> Result<u32, CollectorError> {
        let started = self.service.start_run(input).await?;
        info!("Started run {} for {} in {}", started.id, category, location);

        let run = ScrapingRun::started(&started.id, category, location);
        if let Err(e) = self.store.record_run(&run).await {
            warn!("Could not record run {}: {}", run.run_id, e);
        }

        let result = self
            .process_job(started, category, location, max_results)
            .await;

        let outcome = match &result {
            Ok((discovered, saved)) => RunOutcome {
                state: RunState::Completed,
                profiles_discovered: *discovered,
                profiles_saved: *saved,
                error_message: None,
            },
            Err(e) => RunOutcome {
                state: RunState::Failed,
                profiles_discovered: 0,
                profiles_saved: 0,
                error_message: Some(e.to_string()),
            },
        };
        if let Err(e) = self.store.finish_run(&run.run_id, &outcome).await {
            warn!("Could not update run {}: {}", run.run_id, e);
        }

        result.map(|(_, saved)| saved)
    }

    async fn process_job(
        &self,
        started: JobRun,
        category: Category,
        location: &str,
        max_results: usize,
    ) -> Result<(u32, u32), CollectorError> {
        let (_, items) = apify::collect_results(&self.service, started, &self.settings.poll).await?;
        let discovered = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let saved = self
            .process_profiles(&items, category, location, max_results, ScoringMode::Discovery)
            .await?;
        Ok((discovered, saved))
    }

    /// Manual collection from an explicit hashtag list.
    pub async fn collect_hashtags(
        &self,
        category: Category,
        hashtags: &[String],
    ) -> Result<u32, CollectorError> {
        let input =
            ScraperInput::hashtag_search(hashtags, MANUAL_RESULTS_LIMIT, HASHTAG_SEARCH_LIMIT);
        let saved = self
            .run_hashtag_job(category, "manual", &input, MANUAL_RESULTS_LIMIT as usize)
            .await?;
        info!("Manual collection completed: {} profiles saved", saved);
        Ok(saved)
    }

    /// One hashtag job for a single market city.
    pub async fn collect_city(
        &self,
        category: Category,
        city: &str,
        state: &str,
    ) -> Result<u32, CollectorError> {
        let hashtags =
            heuristics::hashtags_for(city, state, category, heuristics::DEFAULT_HASHTAG_LIMIT);
        let input =
            ScraperInput::hashtag_search(&hashtags, SWEEP_RESULTS_LIMIT, HASHTAG_SEARCH_LIMIT);
        let location = format!("{}, {}", city, state);
        self.run_hashtag_job(category, &location, &input, SWEEP_RESULTS_LIMIT as usize)
            .await
    }

    /// Collects `category` across every market of a priority tier. A city
    /// that fails is logged and the sweep moves on.
    pub async fn geographic_sweep(&self, category: Category, priority: Priority) -> u32 {
        let markets = priority.markets();
        info!(
            "Sweeping {} {:?} priority markets for {}",
            markets.len(),
            priority,
            category
        );

        let mut total = 0;
        for (city, state) in markets {
            self.city_pacer.wait().await;
            match self.collect_city(category, city, state).await {
                Ok(saved) => {
                    info!(
                        "Completed {}, {} for {}: {} profiles saved",
                        city, state, category, saved
                    );
                    total += saved;
                }
                Err(e) => error!("Error processing {}, {} for {}: {}", city, state, category, e),
            }
            self.city_pacer.mark().await;
        }
        total
    }

    /// Sweeps every category over the given priority tiers, in order.
    pub async fn collect_all(
        &self,
        categories: &[Category],
        priorities: &[Priority],
    ) -> Vec<(Category, u32)> {
        let mut results = Vec::with_capacity(categories.len());
        for &category in categories {
            self.category_pacer.wait().await;
            info!("Starting collection for category: {}", category);
            let mut saved = 0;
            for &priority in priorities {
                saved += self.geographic_sweep(category, priority).await;
            }
            info!("Completed collection for {}: {} saved", category, saved);
            results.push((category, saved));
            self.category_pacer.mark().await;
        }
        results
    }

    async fn collect_from_seed(
        &self,
        category: Category,
        handle: &str,
        max_results: usize,
    ) -> Result<u32, CollectorError> {
        let input = ScraperInput::profile_details([handle]);
        let (_, items) =
            apify::run_to_completion(&self.service, &input, &self.settings.seed_poll).await?;
        if items.iter().all(RawProfile::is_error) {
            warn!("No data for @{}", handle);
            return Ok(0);
        }
        self.process_profiles(
            &items,
            category,
            &format!("seed @{}", handle),
            max_results,
            ScoringMode::Seeded,
        )
        .await
    }

    /// Fetches seed profiles one by one until the category holds `target`
    /// vendors. Returns how many were added.
    pub async fn collect_from_seeds(
        &self,
        category: Category,
        handles: &[String],
        target: u32,
    ) -> Result<u32, CollectorError> {
        let current = self.store.count(&VendorFilter::category(category)).await?;
        let needed = target.saturating_sub(current);
        if needed == 0 {
            info!(
                "{} already has {} vendors (target {})",
                category, current, target
            );
            return Ok(0);
        }
        info!(
            "{}: {} vendors, {} more needed from {} seeds",
            category,
            current,
            needed,
            handles.len()
        );

        let mut collected = 0;
        for (i, handle) in handles.iter().enumerate() {
            if collected >= needed {
                info!("Reached target for {}", category);
                break;
            }
            self.profile_pacer.wait().await;
            info!("Processing seed {}/{}: @{}", i + 1, handles.len(), handle);
            match self
                .collect_from_seed(category, handle, (needed - collected) as usize)
                .await
            {
                Ok(saved) => {
                    collected += saved;
                    info!(
                        "Collected {} vendors from @{} (total {})",
                        saved, handle, collected
                    );
                }
                Err(e) => error!("Error processing @{}: {}", handle, e),
            }
            self.profile_pacer.mark().await;
        }
        Ok(collected)
    }

    /// Searches around the biggest stored accounts of a category using
    /// hashtags built from their known location.
    pub async fn expand_from_store(&self, category: Category, limit: u32) -> Result<u32, CollectorError> {
        let seeds = self
            .store
            .discovery_seeds(category, self.settings.min_followers, limit)
            .await?;
        if seeds.is_empty() {
            warn!("No stored {} accounts to expand from", category);
            return Ok(0);
        }

        let mut total = 0;
        for handle in seeds {
            let vendor = match self.store.get_vendor(&handle, category).await? {
                Some(vendor) => vendor,
                None => continue,
            };
            let hashtags = heuristics::contextual_hashtags(
                vendor.city.as_deref(),
                vendor.state.as_deref(),
                category,
                EXPANSION_HASHTAG_LIMIT,
            );
            let input = ScraperInput::hashtag_search(
                &hashtags,
                EXPANSION_RESULTS_LIMIT,
                EXPANSION_SEARCH_LIMIT,
            );

            self.profile_pacer.wait().await;
            let location = format!("network of @{}", handle);
            match self
                .run_hashtag_job(category, &location, &input, EXPANSION_RESULTS_LIMIT as usize)
                .await
            {
                Ok(saved) => {
                    info!("Expanded from @{}: {} saved", handle, saved);
                    total += saved;
                }
                Err(e) => error!("Error expanding from @{}: {}", handle, e),
            }
            self.profile_pacer.mark().await;
        }
        Ok(total)
    }

    /// Fills missing profile images from freshly scraped profile details.
    /// When the scrape has no picture the redirecting fallback URL is used.
    pub async fn fetch_profile_images(&self, limit: u32) -> Result<ImageBackfill, CollectorError> {
        let missing = self.store.missing_profile_image(limit).await?;
        info!("Fetching profile images for {} vendors", missing.len());

        let mut report = ImageBackfill::default();
        for vendor in missing {
            self.profile_pacer.wait().await;
            let input = ScraperInput::profile_details([vendor.handle.as_str()]);
            let scraped =
                match apify::run_to_completion(&self.service, &input, &self.settings.seed_poll).await
                {
                    Ok((_, items)) => items
                        .iter()
                        .filter(|p| !p.is_error())
                        .find_map(|p| p.profile_pic_url().map(ToString::to_string)),
                    Err(e) => {
                        warn!("Could not fetch @{}: {}", vendor.handle, e);
                        None
                    }
                };
            self.profile_pacer.mark().await;

            let (url, from_scrape) = match scraped {
                Some(url) => (url, true),
                None => (instagram::fallback_profile_image(&vendor.handle), false),
            };
            match self
                .store
                .set_profile_image(&vendor.handle, vendor.category, &url)
                .await
            {
                Ok(true) if from_scrape => report.scraped += 1,
                Ok(true) => report.fallback += 1,
                Ok(false) => warn!("@{} disappeared before it could be updated", vendor.handle),
                Err(e) => {
                    error!("Error updating @{}: {}", vendor.handle, e);
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
