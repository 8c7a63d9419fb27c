use crate::error::Error;
use crate::error::*;
use crate::github::models::{Job, JobsResponse, RunsResponse, WorkflowRun};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Thin client for the two GitHub Actions endpoints the pipeline reads.
/// Single-shot GETs, no pagination: runs beyond the first page are not
/// fetched.
pub struct GithubClient {
    https: reqwest::Client,
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: String, repository: &str) -> Self {
        Self {
            https: reqwest::Client::new(),
            token,
            base_url: format!("https://api.github.com/repos/{repository}"),
        }
    }

    pub async fn fetch_recent_runs(
        &self,
        branch: &str,
        per_page: u32,
    ) -> Result<Vec<WorkflowRun>, Error> {
        let url = format!(
            "{}/actions/runs?per_page={per_page}&branch={branch}",
            self.base_url
        );
        let response: RunsResponse = self.get_json(&url).await?;
        debug!(
            total = response.total_count,
            fetched = response.workflow_runs.len(),
            "fetched workflow runs"
        );
        Ok(response.workflow_runs)
    }

    pub async fn fetch_jobs(&self, jobs_url: &str) -> Result<Vec<Job>, Error> {
        let response: JobsResponse = self.get_json(jobs_url).await?;
        debug!(
            total = response.total_count,
            url = jobs_url,
            "fetched jobs"
        );
        Ok(response.jobs)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let response = self
            .https
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return UnexpectedStatusSnafu { status, url }.fail();
        }

        response.json::<T>().await.context(DecodeSnafu)
    }
}
