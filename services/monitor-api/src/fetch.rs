//! Metrics fetcher for the upstream mosdns admin endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Timeout for a single metrics scrape.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// The upstream was unreachable, timed out, or answered with a non-success
/// status. The payload carries the underlying transport error text so the
/// dashboard can surface it to operators.
#[derive(Debug, Error)]
#[error("failed to reach the mosdns metrics endpoint: {0}")]
pub struct ConnectivityError(pub String);

/// Scrapes `<base>/metrics` on demand.
///
/// No retries and no caching: every call is a fresh round trip, so staleness
/// is bounded by request latency rather than an invalidation policy.
#[derive(Debug, Clone)]
pub struct MetricsFetcher {
    client: Client,
    metrics_url: String,
}

impl MetricsFetcher {
    /// Create a fetcher for the given upstream base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            metrics_url: format!("{}/metrics", base_url.trim_end_matches('/')),
        })
    }

    /// Fetch the raw exposition text, unmodified.
    pub async fn fetch(&self) -> std::result::Result<String, ConnectivityError> {
        debug!(url = %self.metrics_url, "scraping upstream metrics");

        let response = self
            .client
            .get(&self.metrics_url)
            .send()
            .await
            .map_err(|e| ConnectivityError(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| ConnectivityError(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ConnectivityError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_upstream_reports_cause() {
        // Bind a listener to reserve a port, then drop it so the connection
        // is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = MetricsFetcher::new(&format!("http://{}", addr)).unwrap();
        let err = fetcher.fetch().await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("failed to reach the mosdns metrics endpoint"));
        // The underlying reqwest error text must survive into the message.
        assert!(message.len() > "failed to reach the mosdns metrics endpoint: ".len());
    }
}
