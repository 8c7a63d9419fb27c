use crate::config::Config;
use crate::github::client::GithubClient;
use crate::store::JobStore;

/// Everything one ingestion-plus-render pass needs, passed explicitly
/// instead of living in process-wide state.
pub struct App {
    pub github: GithubClient,
    pub store: JobStore,
    pub config: Config,
}

impl App {
    pub fn new(github: GithubClient, store: JobStore, config: Config) -> Self {
        Self {
            github,
            store,
            config,
        }
    }
}
