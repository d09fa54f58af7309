//! Shared application state.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::background::BackgroundStore;
use crate::config::MonitorConfig;
use crate::fetch::MetricsFetcher;

/// Timeout for proxied admin requests; these can be heavier than a metrics
/// scrape (e.g. dumping a large plugin list).
const PROXY_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared per-process state. Everything here is read-only after startup;
/// concurrent requests need no locking.
pub struct AppState {
    pub config: MonitorConfig,
    pub fetcher: MetricsFetcher,
    pub proxy_client: reqwest::Client,
    pub backgrounds: BackgroundStore,
}

impl AppState {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let fetcher = MetricsFetcher::new(&config.upstream_base_url)?;

        let proxy_client = reqwest::Client::builder()
            .timeout(PROXY_TIMEOUT)
            .build()
            .context("Failed to create proxy HTTP client")?;

        let backgrounds = BackgroundStore::new(config.upload_dir.clone());

        Ok(Self {
            config,
            fetcher,
            proxy_client,
            backgrounds,
        })
    }
}
