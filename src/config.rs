use crate::{
    apify::{PollSettings, DEFAULT_ACTOR_ID, DEFAULT_BASE_URL},
    collector::{CollectorSettings, DEFAULT_PRIMARY_STATES},
    CollectorError,
};
use std::{env, str::FromStr, time::Duration};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://vendors.db";

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub apify_token: Option<String>,
    pub apify_base_url: String,
    pub apify_actor_id: String,
    pub collector: CollectorSettings,
}

impl Settings {
    pub fn from_env() -> Result<Settings, CollectorError> {
        dotenvy::dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Settings, CollectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parse = |key: &str, default: u64| parse_or(&var, key, default);
        let secs = |key: &str, default: u64| parse(key, default).map(Duration::from_secs);

        let primary_states = match var("PRIMARY_STATES") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_PRIMARY_STATES
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        let poll = PollSettings {
            timeout: secs("JOB_TIMEOUT_SECS", 3600)?,
            interval: secs("POLL_INTERVAL_SECS", 30)?,
            error_backoff: secs("POLL_ERROR_BACKOFF_SECS", 60)?,
        };

        let collector = CollectorSettings {
            quality_threshold: parse_or(&var, "QUALITY_THRESHOLD", 4)?,
            seed_quality_threshold: parse_or(&var, "SEED_QUALITY_THRESHOLD", 2)?,
            min_followers: parse_or(&var, "MIN_FOLLOWERS", 500)?,
            primary_states,
            city_delay: secs("CITY_DELAY_SECS", 300)?,
            profile_delay: secs("PROFILE_DELAY_SECS", 30)?,
            category_delay: secs("CATEGORY_DELAY_SECS", 120)?,
            seed_poll: poll.with_timeout(poll.timeout.min(Duration::from_secs(180))),
            poll,
        };

        Ok(Settings {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            apify_token: var("APIFY_TOKEN"),
            apify_base_url: var("APIFY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            apify_actor_id: var("APIFY_ACTOR_ID").unwrap_or_else(|| DEFAULT_ACTOR_ID.to_string()),
            collector,
        })
    }

    /// The job service token; only commands that start jobs need it.
    pub fn apify_token(&self) -> Result<&str, CollectorError> {
        self.apify_token
            .as_deref()
            .ok_or_else(|| CollectorError::Config("APIFY_TOKEN is not set".to_string()))
    }
}

fn parse_or<V, T>(var: &V, key: &str, default: T) -> Result<T, CollectorError>
where
    V: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| CollectorError::Config(format!("{} has an invalid value: {}", key, value))),
        None => Ok(default),
    }
}
