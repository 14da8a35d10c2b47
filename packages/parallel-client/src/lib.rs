//! Pure Parallel FindAll REST API client.
//!
//! A minimal client for the Parallel FindAll beta API. Supports creating
//! entity-discovery runs, polling for completion, and fetching matched
//! candidates.
//!
//! # Example
//!
//! ```rust,ignore
//! use parallel_client::{FindAllRunInput, Generator, MatchCondition, ParallelClient};
//!
//! let client = ParallelClient::new("your-api-key".into());
//!
//! let run = client
//!     .create_findall_run(&FindAllRunInput {
//!         objective: "Find all preclinical I&I licensing deals since 2021".into(),
//!         entity_type: "deals".into(),
//!         match_conditions: vec![MatchCondition::new("since_2021", "Deal happened since 2021")],
//!         generator: Generator::Core,
//!         match_limit: 100,
//!     })
//!     .await?;
//! client.wait_for_completion(&run.findall_id, |_| {}).await?;
//!
//! let result = client.fetch_result::<serde_json::Value>(&run.findall_id).await?;
//! println!("{} candidates", result.candidates.len());
//! ```

pub mod error;
pub mod types;

pub use error::{ParallelError, Result};
pub use types::{
    FindAllResult, FindAllRun, FindAllRunInput, Generator, MatchCondition, RunMetrics, RunStatus,
};

use std::time::Duration;

use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://api.parallel.ai";

/// Beta flag required by every FindAll endpoint.
pub const FINDALL_BETA: &str = "findall-2025-09-15";

/// Fixed delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub struct ParallelClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    betas: Vec<String>,
    poll_interval: Duration,
}

impl ParallelClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
            betas: vec![FINDALL_BETA.to_string()],
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Like [`ParallelClient::new`] but rejects a blank key up front.
    pub fn try_new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ParallelError::Config("Parallel API key is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_betas(mut self, betas: Vec<String>) -> Self {
        self.betas = betas;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn runs_url(&self) -> String {
        format!("{}/v1beta/findall/runs", self.base_url)
    }

    fn run_url(&self, findall_id: &str) -> String {
        format!("{}/{}", self.runs_url(), findall_id)
    }

    fn result_url(&self, findall_id: &str) -> String {
        format!("{}/result", self.run_url(findall_id))
    }

    fn beta_header(&self) -> String {
        self.betas.join(",")
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let resp = request
            .header("x-api-key", &self.api_key)
            .header("parallel-beta", self.beta_header())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ParallelError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Create a FindAll run. Returns immediately with run metadata.
    pub async fn create_findall_run(&self, input: &FindAllRunInput) -> Result<FindAllRun> {
        let run: FindAllRun = self
            .send(self.client.post(self.runs_url()).json(input))
            .await?;
        tracing::info!(
            findall_id = %run.findall_id,
            generator = %input.generator,
            match_limit = input.match_limit,
            "FindAll run created"
        );
        Ok(run)
    }

    /// Fetch the current status of a run.
    pub async fn retrieve_run(&self, findall_id: &str) -> Result<FindAllRun> {
        self.send(self.client.get(self.run_url(findall_id))).await
    }

    /// Poll until a run reports `completed`.
    ///
    /// `on_status` sees every non-terminal status. There is no retry limit:
    /// polling continues until completion or an HTTP/API error.
    pub async fn wait_for_completion<F>(&self, findall_id: &str, mut on_status: F) -> Result<FindAllRun>
    where
        F: FnMut(&FindAllRun),
    {
        loop {
            let run = self.retrieve_run(findall_id).await?;
            if run.is_completed() {
                tracing::info!(
                    findall_id,
                    generated = ?run.status.metrics.generated_candidates_count,
                    matched = ?run.status.metrics.matched_candidates_count,
                    "FindAll run completed"
                );
                return Ok(run);
            }

            tracing::debug!(findall_id, status = %run.status.status, "Run still in progress");
            on_status(&run);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetch candidates of a completed run.
    pub async fn fetch_result<T: DeserializeOwned>(&self, findall_id: &str) -> Result<FindAllResult<T>> {
        let result: FindAllResult<T> = self
            .send(self.client.get(self.result_url(findall_id)))
            .await?;
        tracing::info!(findall_id, count = result.candidates.len(), "Fetched FindAll candidates");
        Ok(result)
    }
}
