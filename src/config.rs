use crate::error::Error;
use crate::error::*;
use serde::Deserialize;
use snafu::ResultExt;
use std::fs;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// "owner/name" slug of the repository whose workflow runs are pulled.
    pub repository: String,
    pub branch: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Version labels expected inside job names, e.g. "v1", "v2-beta".
    pub versions: Vec<String>,
    /// Platform labels expected inside job names, e.g. "ubuntu-22.04".
    pub platforms: Vec<String>,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_page_size() -> u32 {
    100
}

fn default_database_url() -> String {
    "sqlite://jobs.db".to_string()
}

fn default_output_path() -> String {
    "failure-rates.html".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8090".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Config, Error> {
        let contents = fs::read_to_string(path).context(ConfigReadSnafu { path })?;
        Self::parse(&contents).context(ConfigParseSnafu { path })
    }

    fn parse(contents: &str) -> Result<Config, serde_norway::Error> {
        serde_norway::from_str::<Config>(contents)
    }
}
