//! Dashboard status endpoint: fetch + parse per request.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /api/mosdns_status - scrape the upstream metrics endpoint and return
/// the parsed snapshot.
///
/// Each call performs a fresh fetch; a connectivity failure maps to 502 with
/// the transport error text so operators can diagnose upstream
/// misconfiguration.
pub async fn mosdns_status_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.fetcher.fetch().await {
        Ok(text) => Json(metrics_parser::parse(&text)).into_response(),
        Err(e) => {
            warn!(error = %e, "metrics scrape failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
