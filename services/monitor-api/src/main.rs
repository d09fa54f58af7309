//! mosdns monitoring dashboard API server.
//!
//! Serves the dashboard's JSON API:
//! - On-demand scrape + parse of the upstream `/metrics` endpoint
//! - Transparent proxy to the upstream plugin admin API
//! - Custom background image storage for the UI

use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use monitor_api::config::MonitorConfig;
use monitor_api::handlers;
use monitor_api::state::AppState;

/// Monitoring dashboard API for a mosdns instance
#[derive(Parser, Debug)]
#[command(name = "monitor-api")]
#[command(about = "Monitoring dashboard API for a mosdns instance")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5001", env = "MONITOR_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();

    let config = MonitorConfig::from_env();
    info!(
        upstream = %config.upstream_base_url,
        upload_dir = %config.upload_dir.display(),
        "Starting monitor-api"
    );

    let state = Arc::new(AppState::new(config)?);
    state.backgrounds.ensure_dir().await?;

    let app = Router::new()
        // Dashboard status
        .route(
            "/api/mosdns_status",
            get(handlers::status::mosdns_status_handler),
        )
        // Admin plugin proxy
        .route(
            "/plugins/*subpath",
            get(handlers::proxy::plugins_proxy_handler)
                .post(handlers::proxy::plugins_proxy_handler),
        )
        // Background image API
        .route(
            "/api/background_status",
            get(handlers::background::background_status_handler),
        )
        .route(
            "/api/upload_background",
            post(handlers::background::upload_background_handler),
        )
        .route(
            "/api/remove_background",
            post(handlers::background::remove_background_handler),
        )
        .route(
            "/backgrounds/:filename",
            get(handlers::background::serve_background_handler),
        )
        // Health
        .route("/health", get(handlers::health::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!(listen = %args.listen, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
