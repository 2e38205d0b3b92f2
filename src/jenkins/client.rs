use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::config::HttpConfig;
use crate::error::{RobotrendError, Result};

use super::types::{BuildListing, RobotReport};
use crate::trends::BuildReport;

const MAX_ATTEMPTS: u32 = 2;

/// Jenkins REST API client.
///
/// Every fetch degrades to `None` on failure: unreachable endpoints, HTTP
/// errors (404 included) and unparseable bodies are all "no data", never
/// fatal. One job's dead endpoint must not abort the whole run.
pub struct JenkinsClient {
    client: Client,
    semaphore: Arc<Semaphore>,
}

impl JenkinsClient {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("robotrend/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| RobotrendError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(http.max_concurrent_requests)),
        })
    }

    /// List the build numbers Jenkins knows for a job, in the order the
    /// server reports them (no guaranteed sort).
    pub async fn list_builds(&self, job_url: &str) -> Option<Vec<u64>> {
        let url = format!("{job_url}/api/json?tree=builds[number]");
        let listing: BuildListing = self.get_json(&url).await?;

        Some(listing.builds.into_iter().map(|b| b.number).collect())
    }

    /// Fetch the Robot Framework report for one build of a job.
    pub async fn fetch_build_report(&self, job_url: &str, build: u64) -> Option<BuildReport> {
        let url = format!("{job_url}/{build}/robot/api/json");
        let report: RobotReport = self.get_json(&url).await?;

        Some(report.into())
    }

    /// GET a JSON document, retrying transport errors and 5xx responses up
    /// to `MAX_ATTEMPTS` times with no backoff. Anything else is "no data".
    async fn get_json<T>(&self, url: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        // Acquire semaphore permit to limit concurrent requests
        let _permit = self.semaphore.acquire().await.ok()?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let response = match self.client.get(url).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if attempt >= MAX_ATTEMPTS {
                        warn!("Giving up on {url} after {attempt} attempts: {e}");
                        return None;
                    }
                    debug!("Request to {url} failed ({e}), retrying ({attempt}/{MAX_ATTEMPTS})");
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                if attempt >= MAX_ATTEMPTS {
                    warn!("Giving up on {url} after {attempt} attempts (status {status})");
                    return None;
                }
                debug!("Server error from {url} (status {status}), retrying ({attempt}/{MAX_ATTEMPTS})");
                continue;
            }

            if !status.is_success() {
                debug!("No data at {url} (status {status})");
                return None;
            }

            return match response.json::<T>().await {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Unparseable response from {url}: {e}");
                    None
                }
            };
        }
    }
}
