mod app;
mod chart;
mod config;
mod error;
mod github;
mod ingest;
mod stats;
mod store;
mod util;
mod web;

use crate::app::App;
use crate::config::Config;
use crate::github::client::GithubClient;
use crate::store::JobStore;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load("config.yml")?;
    let token =
        env::var("GITHUB_TOKEN").map_err(|_| error::Error::MissingEnvVar {
            name: "GITHUB_TOKEN",
        })?;

    let github = GithubClient::new(token, &config.repository);
    let store = JobStore::connect(&config.database_url).await?;
    let app = App::new(github, store, config);

    let summary = match ingest::run(&app).await {
        Ok(summary) => summary,
        Err(e) => {
            if e.is_transient() {
                warn!("ingestion failed on a transient error, rerunning may succeed");
            }
            return Err(e.into());
        }
    };
    info!(
        runs = summary.runs,
        jobs = summary.jobs,
        "ingestion pass complete"
    );

    let matrix =
        stats::failure_rates(&app.store, &app.config.platforms, &app.config.versions).await?;
    if matrix.total == 0 {
        warn!("store is empty, the chart will show no data");
    }

    let page = chart::render(&matrix, &app.config.versions);
    chart::write_to(&app.config.output_path, &page)?;

    // The store is only needed for one ingestion-plus-render pass.
    app.store.close().await;

    let listener = tokio::net::TcpListener::bind(&app.config.listen_addr).await?;
    info!("Listening on {}", app.config.listen_addr);
    web::serve(listener, app.config.output_path.clone()).await?;

    Ok(())
}
