use crate::app::App;
use crate::error::Error;
use crate::error::*;
use crate::github::models::Job;
use crate::util::time::{elapsed_seconds, format_duration};
use snafu::OptionExt;
use tracing::{debug, info};

pub struct IngestSummary {
    pub runs: usize,
    pub jobs: usize,
}

/// One ingestion pass: enumerate recent runs, fetch every run's jobs,
/// derive runtimes, then replace the stored snapshot in a single write.
/// The first error aborts the pass before anything reaches the store, so
/// aggregation never sees a partially-replaced snapshot.
pub async fn run(app: &App) -> Result<IngestSummary, Error> {
    let config = &app.config;
    let runs = app
        .github
        .fetch_recent_runs(&config.branch, config.page_size)
        .await?;
    info!(runs = runs.len(), branch = %config.branch, "enumerated workflow runs");

    let mut snapshot = Vec::new();
    for run in &runs {
        let jobs = app.github.fetch_jobs(&run.jobs_url).await?;
        for job in jobs {
            snapshot.push(enrich(job)?);
        }
    }

    app.store.replace_all(&snapshot).await?;

    Ok(IngestSummary {
        runs: runs.len(),
        jobs: snapshot.len(),
    })
}

/// Derive the runtime of a job and each of its steps from their
/// start/completion timestamps.
fn enrich(mut job: Job) -> Result<Job, Error> {
    let started_at = job.started_at.as_deref().context(MissingTimestampSnafu {
        field: "started_at",
    })?;
    let completed_at = job
        .completed_at
        .as_deref()
        .context(MissingTimestampSnafu {
            field: "completed_at",
        })?;
    job.runtime = elapsed_seconds(started_at, completed_at)?;
    debug!(
        job = %job.name,
        runtime = %format_duration(job.runtime),
        "derived job runtime"
    );

    for step in &mut job.steps {
        let started_at = step.started_at.as_deref().context(MissingTimestampSnafu {
            field: "started_at",
        })?;
        let completed_at = step
            .completed_at
            .as_deref()
            .context(MissingTimestampSnafu {
                field: "completed_at",
            })?;
        step.runtime = elapsed_seconds(started_at, completed_at)?;
    }

    Ok(job)
}
