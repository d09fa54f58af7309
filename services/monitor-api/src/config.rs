//! Environment-driven service configuration.

use std::path::PathBuf;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the mosdns admin interface (metrics + plugin API).
    pub upstream_base_url: String,

    /// Directory holding the custom background image.
    pub upload_dir: PathBuf,
}

impl MonitorConfig {
    /// Build the configuration from environment variables, falling back to
    /// the defaults of a local mosdns instance.
    pub fn from_env() -> Self {
        let upstream_base_url = normalize_base_url(
            &std::env::var("MOSDNS_ADMIN_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:9099".to_string()),
        );

        let upload_dir = std::env::var("MONITOR_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Self {
            upstream_base_url,
            upload_dir,
        }
    }
}

/// Strip trailing slashes so path joins stay predictable.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
