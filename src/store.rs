use crate::error::Error;
use crate::error::*;
use crate::github::models::Job;
use snafu::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id         INTEGER NOT NULL,
    name       TEXT    NOT NULL,
    labels     TEXT    NOT NULL,
    status     TEXT    NOT NULL,
    conclusion TEXT,
    runtime    INTEGER NOT NULL,
    steps      TEXT    NOT NULL
)
"#;

/// Snapshot store for the latest ingestion pass. Holds one row per job;
/// `labels` and `steps` are JSON-encoded. The whole table is replaced on
/// every pass.
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)
            .context(StoreSnafu)?
            .create_if_missing(true);

        // The pipeline is strictly sequential, one connection is enough.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .context(StoreSnafu)?;

        sqlx::query(SCHEMA).execute(&pool).await.context(StoreSnafu)?;

        Ok(Self { pool })
    }

    /// Replace the entire snapshot with `jobs` in one transaction. A failed
    /// insert rolls the whole replacement back, leaving the previous
    /// snapshot intact.
    pub async fn replace_all(&self, jobs: &[Job]) -> Result<(), Error> {
        let mut tx = self.pool.begin().await.context(StoreSnafu)?;

        sqlx::query("DELETE FROM jobs")
            .execute(&mut *tx)
            .await
            .context(StoreSnafu)?;

        for job in jobs {
            let labels =
                serde_json::to_string(&job.labels).context(SerializationErrorJsonSnafu)?;
            let steps =
                serde_json::to_string(&job.steps).context(SerializationErrorJsonSnafu)?;

            sqlx::query(
                r#"
                INSERT INTO jobs (id, name, labels, status, conclusion, runtime, steps)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(job.id)
            .bind(&job.name)
            .bind(labels)
            .bind(&job.status)
            .bind(job.conclusion.as_deref())
            .bind(job.runtime)
            .bind(steps)
            .execute(&mut *tx)
            .await
            .context(StoreSnafu)?;
        }

        tx.commit().await.context(StoreSnafu)?;
        info!(jobs = jobs.len(), "snapshot replaced");

        Ok(())
    }

    /// Failed jobs whose name contains both the version and the platform
    /// label. Substring containment against the free-text name, so
    /// "build-v1-extra (ubuntu-22.04)" matches version "v1".
    pub async fn count_failures_matching(
        &self,
        version: &str,
        platform: &str,
    ) -> Result<i64, Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM jobs
            WHERE conclusion = 'failure'
              AND instr(name, ?1) > 0
              AND instr(name, ?2) > 0
            "#,
        )
        .bind(version)
        .bind(platform)
        .fetch_one(&self.pool)
        .await
        .context(StoreSnafu)
    }

    pub async fn count_all(&self) -> Result<i64, Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await
            .context(StoreSnafu)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("store connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: i64, name: &str, conclusion: &str) -> Job {
        Job {
            id,
            name: name.to_string(),
            labels: vec!["ubuntu-22.04".to_string()],
            status: "completed".to_string(),
            conclusion: Some(conclusion.to_string()),
            started_at: Some("2024-03-01T12:00:00Z".to_string()),
            completed_at: Some("2024-03-01T12:05:00Z".to_string()),
            runtime: 300,
            steps: Vec::new(),
        }
    }

    async fn store() -> JobStore {
        JobStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn replace_all_then_count_all_matches() {
        let store = store().await;
        let jobs = vec![
            job(1, "build-v1 (ubuntu-22.04)", "success"),
            job(2, "build-v1 (macos-12)", "failure"),
        ];

        store.replace_all(&jobs).await.unwrap();
        assert_eq!(store.count_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn replace_all_drops_prior_snapshot() {
        let store = store().await;
        store
            .replace_all(&[job(1, "build-v1 (windows-2022)", "failure")])
            .await
            .unwrap();

        store
            .replace_all(&[job(2, "build-v2-beta (ubuntu-22.04)", "success")])
            .await
            .unwrap();

        assert_eq!(store.count_all().await.unwrap(), 1);
        // the windows failure from the first pass is gone
        assert_eq!(
            store
                .count_failures_matching("v1", "windows-2022")
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_to_prior_snapshot() {
        let store = store().await;
        store
            .replace_all(&[
                job(1, "build-v1 (ubuntu-22.04)", "success"),
                job(2, "build-v1 (macos-12)", "failure"),
            ])
            .await
            .unwrap();

        // reject one specific id so the second insert of the batch fails
        sqlx::query(
            "CREATE TRIGGER reject_insert BEFORE INSERT ON jobs \
             WHEN NEW.id = 99 BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let result = store
            .replace_all(&[
                job(3, "build-v2-beta (ubuntu-22.04)", "success"),
                job(99, "build-v2-beta (macos-12)", "success"),
            ])
            .await;
        assert!(matches!(result, Err(Error::Store { .. })));

        // the delete and the partial insert rolled back together
        assert_eq!(store.count_all().await.unwrap(), 2);
        assert_eq!(
            store
                .count_failures_matching("v1", "macos-12")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn replace_all_with_empty_snapshot_empties_store() {
        let store = store().await;
        store
            .replace_all(&[job(1, "build-v1 (ubuntu-22.04)", "failure")])
            .await
            .unwrap();
        store.replace_all(&[]).await.unwrap();
        assert_eq!(store.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn counts_only_failures_matching_both_labels() {
        let store = store().await;
        store
            .replace_all(&[
                job(1, "build-v1 (ubuntu-22.04)", "failure"),
                job(2, "build-v1 (ubuntu-22.04)", "success"),
                job(3, "build-v1 (macos-12)", "failure"),
                job(4, "build-v2-beta (ubuntu-22.04)", "failure"),
            ])
            .await
            .unwrap();

        assert_eq!(
            store
                .count_failures_matching("v1", "ubuntu-22.04")
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .count_failures_matching("v1", "macos-12")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn matching_is_substring_based() {
        let store = store().await;
        store
            .replace_all(&[job(1, "build-v1-extra (ubuntu-22.04)", "failure")])
            .await
            .unwrap();

        // "v1" is contained in "v1-extra", so this matches
        assert_eq!(
            store
                .count_failures_matching("v1", "ubuntu-22.04")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn v2_beta_also_matches_v2() {
        let store = store().await;
        store
            .replace_all(&[job(1, "build-v2-beta (ubuntu-22.04)", "failure")])
            .await
            .unwrap();

        assert_eq!(
            store
                .count_failures_matching("v2-beta", "ubuntu-22.04")
                .await
                .unwrap(),
            1
        );
        // substring semantics: the bare "v2" filter matches the beta too
        assert_eq!(
            store
                .count_failures_matching("v2", "ubuntu-22.04")
                .await
                .unwrap(),
            1
        );
    }
}
