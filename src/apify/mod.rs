mod client;
mod input;

pub use client::{ApifyClient, DEFAULT_ACTOR_ID, DEFAULT_BASE_URL};
pub use input::{ProxyConfiguration, ScraperInput};

use crate::{profile::RawProfile, CollectorError};
use serde::Deserialize;
use std::{fmt, time::Duration};
use tokio::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "TIMING-OUT")]
    TimingOut,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(rename = "ABORTING")]
    Aborting,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// A third-party service running asynchronous scraping jobs.
#[async_trait::async_trait]
pub trait JobService {
    async fn start_run(&self, input: &ScraperInput) -> Result<JobRun, CollectorError>;
    async fn get_run(&self, run_id: &str) -> Result<JobRun, CollectorError>;
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawProfile>, CollectorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
    pub error_backoff: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            timeout: Duration::from_secs(3600),
            interval: Duration::from_secs(30),
            error_backoff: Duration::from_secs(60),
        }
    }
}

impl PollSettings {
    pub fn with_timeout(self, timeout: Duration) -> PollSettings {
        PollSettings { timeout, ..self }
    }
}

/// Polls a run until it reaches a terminal status or `poll.timeout`
/// elapses. Transport errors while polling are logged and retried after
/// `poll.error_backoff`.
pub async fn wait_for_completion<J>(
    service: &J,
    run_id: &str,
    poll: &PollSettings,
) -> Result<JobRun, CollectorError>
where
    J: JobService + Sync + ?Sized,
{
    let started = Instant::now();

    while started.elapsed() < poll.timeout {
        match service.get_run(run_id).await {
            Ok(run) if run.status == RunStatus::Succeeded => {
                debug!("Run {} succeeded after {:?}", run_id, started.elapsed());
                return Ok(run);
            }
            Ok(run) if run.status.is_terminal() => {
                return Err(CollectorError::JobFailed {
                    run_id: run_id.to_string(),
                    status: run.status.to_string(),
                    message: run.status_message.unwrap_or_default(),
                });
            }
            Ok(run) => {
                debug!("Run {} is {}", run_id, run.status);
                tokio::time::sleep(poll.interval).await;
            }
            Err(e) => {
                error!("Error checking run {} status: {}", run_id, e);
                tokio::time::sleep(poll.error_backoff).await;
            }
        }
    }

    Err(CollectorError::JobTimeout {
        run_id: run_id.to_string(),
        waited: poll.timeout,
    })
}

/// Starts a run, waits for it and downloads its dataset.
pub async fn run_to_completion<J>(
    service: &J,
    input: &ScraperInput,
    poll: &PollSettings,
) -> Result<(JobRun, Vec<RawProfile>), CollectorError>
where
    J: JobService + Sync + ?Sized,
{
    let started = service.start_run(input).await?;
    info!("Started scraper run {}", started.id);
    collect_results(service, started, poll).await
}

/// Waits for an already started run and downloads its dataset.
pub async fn collect_results<J>(
    service: &J,
    started: JobRun,
    poll: &PollSettings,
) -> Result<(JobRun, Vec<RawProfile>), CollectorError>
where
    J: JobService + Sync + ?Sized,
{
    let run = wait_for_completion(service, &started.id, poll).await?;
    let dataset_id = run
        .default_dataset_id
        .clone()
        .or(started.default_dataset_id)
        .ok_or_else(|| CollectorError::MissingDataset(run.id.clone()))?;

    let items = service.dataset_items(&dataset_id).await?;
    debug!("Run {} produced {} items", run.id, items.len());
    Ok((run, items))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// In-memory job service replaying scripted statuses and datasets.
    #[derive(Default)]
    pub(crate) struct FakeJobService {
        pub statuses: Mutex<VecDeque<Result<RunStatus, ()>>>,
        pub datasets: Mutex<VecDeque<Vec<RawProfile>>>,
        pub inputs: Mutex<Vec<ScraperInput>>,
        pub fail_start: Mutex<HashMap<usize, String>>,
        pub start_times: Mutex<Vec<Instant>>,
        next_id: Mutex<usize>,
    }

    impl FakeJobService {
        pub fn with_datasets(datasets: Vec<Vec<RawProfile>>) -> FakeJobService {
            FakeJobService {
                datasets: Mutex::new(datasets.into()),
                ..Default::default()
            }
        }

        pub fn started(&self) -> usize {
            *self.next_id.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl JobService for FakeJobService {
        async fn start_run(&self, input: &ScraperInput) -> Result<JobRun, CollectorError> {
            let id = {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                *next
            };
            self.inputs.lock().unwrap().push(input.clone());
            self.start_times.lock().unwrap().push(Instant::now());
            if let Some(message) = self.fail_start.lock().unwrap().get(&id) {
                return Err(CollectorError::Config(message.clone()));
            }
            Ok(JobRun {
                id: format!("run-{}", id),
                status: RunStatus::Ready,
                default_dataset_id: Some(format!("ds-{}", id)),
                status_message: None,
            })
        }

        async fn get_run(&self, run_id: &str) -> Result<JobRun, CollectorError> {
            let next = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(RunStatus::Succeeded));
            match next {
                Ok(status) => Ok(JobRun {
                    id: run_id.to_string(),
                    status,
                    default_dataset_id: None,
                    status_message: Some("scripted".to_string()),
                }),
                Err(()) => Err(CollectorError::Config("connection reset".to_string())),
            }
        }

        async fn dataset_items(&self, _dataset_id: &str) -> Result<Vec<RawProfile>, CollectorError> {
            Ok(self.datasets.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    pub(crate) fn fast_poll() -> PollSettings {
        PollSettings {
            timeout: Duration::from_millis(200),
            interval: Duration::from_millis(1),
            error_backoff: Duration::from_millis(1),
        }
    }
}
