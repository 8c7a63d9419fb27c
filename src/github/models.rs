use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RunsResponse {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// One past execution of the workflow. Only used to reach its job list,
/// never persisted.
#[derive(Deserialize)]
pub struct WorkflowRun {
    pub jobs_url: String,
}

#[derive(Deserialize)]
pub struct JobsResponse {
    pub total_count: u64,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub status: String,
    pub conclusion: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    /// Derived during ingestion, never supplied by the API.
    #[serde(skip_deserializing, default)]
    pub runtime: i64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    #[serde(skip_deserializing, default)]
    pub runtime: i64,
}
