use super::{JobRun, JobService, ScraperInput};
use crate::{profile::RawProfile, CollectorError};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, error, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";
pub const DEFAULT_ACTOR_ID: &str = "shu8hvrXbJbY3Eb9W";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

pub struct ApifyClient {
    client: Client,
    base_url: String,
    actor_id: String,
    token: String,
}

impl ApifyClient {
    pub fn new(base_url: &str, actor_id: &str, token: &str) -> Result<ApifyClient, CollectorError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApifyClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            actor_id: actor_id.to_string(),
            token: token.to_string(),
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, CollectorError> {
        let response = response.error_for_status()?;
        let url = response.url().to_string();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            error!(
                "Failed to parse response from {}: {} (body: {})",
                url,
                e,
                String::from_utf8_lossy(&body)
            );
            CollectorError::from(e)
        })
    }
}

#[async_trait::async_trait]
impl JobService for ApifyClient {
    async fn start_run(&self, input: &ScraperInput) -> Result<JobRun, CollectorError> {
        let url = format!("{}/acts/{}/runs", self.base_url, self.actor_id);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;
        let envelope: Envelope<JobRun> = Self::parse(response).await?;
        Ok(envelope.data)
    }

    async fn get_run(&self, run_id: &str) -> Result<JobRun, CollectorError> {
        let url = format!("{}/actor-runs/{}", self.base_url, run_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let envelope: Envelope<JobRun> = Self::parse(response).await?;
        Ok(envelope.data)
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawProfile>, CollectorError> {
        let url = format!("{}/datasets/{}/items", self.base_url, dataset_id);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("format", "json"), ("clean", "true")])
            .send()
            .await?;
        let items: Vec<serde_json::Value> = Self::parse(response).await?;
        Ok(decode_items(items))
    }
}

/// Decodes dataset items one by one so a single malformed item does not
/// discard the whole dataset.
fn decode_items(items: Vec<serde_json::Value>) -> Vec<RawProfile> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<RawProfile>(item) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Skipping malformed dataset item {}: {}", i, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apify::RunStatus;
    use serde_json::json;

    #[test]
    fn decodes_run_envelope() {
        let envelope: Envelope<JobRun> = serde_json::from_value(json!({
            "data": {
                "id": "HG7ML7M8z78YcAPEB",
                "actId": "shu8hvrXbJbY3Eb9W",
                "status": "RUNNING",
                "defaultDatasetId": "wmKPijuyDnPZAPRMk"
            }
        }))
        .unwrap();
        assert_eq!(envelope.data.id, "HG7ML7M8z78YcAPEB");
        assert_eq!(envelope.data.status, RunStatus::Running);
        assert_eq!(
            envelope.data.default_dataset_id.as_deref(),
            Some("wmKPijuyDnPZAPRMk")
        );
    }

    #[test]
    fn malformed_items_are_skipped() {
        let items = decode_items(vec![
            json!({"ownerUsername": "makeupwendy", "ownerFollowersCount": 8900}),
            json!({"ownerUsername": 42}),
            json!({"error": "no_items", "errorDescription": "Empty or private data"}),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].handle().as_deref(), Some("makeupwendy"));
        assert!(items[1].is_error());
    }

    #[test]
    fn trims_base_url() {
        let client = ApifyClient::new("https://api.example/v2/", DEFAULT_ACTOR_ID, "t").unwrap();
        assert_eq!(client.base_url, "https://api.example/v2");
    }
}
