mod sqlite;

pub use sqlite::{RunTable, SqliteVendorStore, VendorTable};

use crate::{vendor::VendorRecord, Category, CollectorError};
use chrono::{DateTime, Utc};
use std::{collections::HashSet, fmt, str::FromStr};

/// Equality filters over vendor records. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorFilter {
    pub category: Option<Category>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl VendorFilter {
    pub fn all() -> VendorFilter {
        VendorFilter::default()
    }

    pub fn category(category: Category) -> VendorFilter {
        VendorFilter {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn in_city(mut self, city: &str, state: &str) -> VendorFilter {
        self.city = Some(city.to_string());
        self.state = Some(state.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunState {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(RunState::Running),
            "completed" => Ok(RunState::Completed),
            "failed" => Ok(RunState::Failed),
            other => Err(CollectorError::Config(format!("unknown run state {}", other))),
        }
    }
}

/// Book-keeping for one scraping job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapingRun {
    pub run_id: String,
    pub category: Category,
    pub location: String,
    pub state: RunState,
    pub profiles_discovered: u32,
    pub profiles_saved: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl ScrapingRun {
    pub fn started(run_id: &str, category: Category, location: &str) -> ScrapingRun {
        ScrapingRun {
            run_id: run_id.to_string(),
            category,
            location: location.to_string(),
            state: RunState::Running,
            profiles_discovered: 0,
            profiles_saved: 0,
            started_at: crate::utils::get_now(),
            completed_at: None,
            error_message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub state: RunState,
    pub profiles_discovered: u32,
    pub profiles_saved: u32,
    pub error_message: Option<String>,
}

/// The vendor directory. Records are unique on (handle, category).
#[async_trait::async_trait]
pub trait VendorStore {
    /// Inserts the record or, when (handle, category) exists, overwrites
    /// its mutable columns while keeping `created_at`.
    async fn upsert_vendor(&self, vendor: &VendorRecord) -> Result<(), CollectorError>;

    async fn get_vendor(
        &self,
        handle: &str,
        category: Category,
    ) -> Result<Option<VendorRecord>, CollectorError>;

    async fn existing_handles(&self, category: Category) -> Result<HashSet<String>, CollectorError>;

    async fn count(&self, filter: &VendorFilter) -> Result<u32, CollectorError>;

    /// Matching records, largest audience first.
    async fn find(&self, filter: &VendorFilter) -> Result<Vec<VendorRecord>, CollectorError>;

    /// Returns whether a record was removed.
    async fn delete_vendor(&self, handle: &str, category: Category) -> Result<bool, CollectorError>;

    async fn missing_instagram_url(&self) -> Result<Vec<VendorRecord>, CollectorError>;

    async fn set_instagram_url(
        &self,
        handle: &str,
        category: Category,
        url: &str,
    ) -> Result<bool, CollectorError>;

    /// Records without a profile image, largest audience first.
    async fn missing_profile_image(&self, limit: u32) -> Result<Vec<VendorRecord>, CollectorError>;

    async fn set_profile_image(
        &self,
        handle: &str,
        category: Category,
        url: &str,
    ) -> Result<bool, CollectorError>;

    /// Handles of the biggest accounts in a category, for network expansion.
    async fn discovery_seeds(
        &self,
        category: Category,
        min_followers: i64,
        limit: u32,
    ) -> Result<Vec<String>, CollectorError>;

    async fn record_run(&self, run: &ScrapingRun) -> Result<(), CollectorError>;

    async fn finish_run(&self, run_id: &str, outcome: &RunOutcome) -> Result<(), CollectorError>;

    /// Most recently started runs first.
    async fn recent_runs(&self, limit: u32) -> Result<Vec<ScrapingRun>, CollectorError>;
}
