//! Transparent proxy for the mosdns admin plugin API.
//!
//! The dashboard UI calls `/plugins/<subpath>` (e.g.
//! `/plugins/my_fakeiplist/show`); this forwards to the same path on the
//! upstream admin interface and relays the result. Text and JSON responses
//! are forced to `text/plain` so the browser never interprets upstream
//! output as HTML.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Path},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::state::AppState;

/// GET|POST /plugins/*subpath - forward to the upstream plugin API.
///
/// POST is accepted because some plugin actions (e.g. cache flush) are
/// triggered with an empty POST.
pub async fn plugins_proxy_handler(
    Extension(state): Extension<Arc<AppState>>,
    method: Method,
    Path(subpath): Path<String>,
) -> Response {
    let url = format!("{}/plugins/{}", state.config.upstream_base_url, subpath);

    let request = match method {
        Method::POST => state.proxy_client.post(&url),
        _ => state.proxy_client.get(&url),
    };

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return proxy_failure(&url, &e.to_string()),
    };

    if let Err(e) = response.error_for_status_ref() {
        return proxy_failure(&url, &e.to_string());
    }

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/plain; charset=utf-8")
        .to_string();

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return proxy_failure(&url, &e.to_string()),
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, relay_content_type(&content_type))
        .body(Body::from(body))
        .unwrap()
}

/// Upstream `text/*` and JSON bodies are rendered as plain text; anything
/// else (images, octet streams) keeps its original content type.
fn relay_content_type(upstream: &str) -> String {
    if upstream.contains("text") || upstream.contains("json") {
        "text/plain; charset=utf-8".to_string()
    } else {
        upstream.to_string()
    }
}

fn proxy_failure(url: &str, cause: &str) -> Response {
    warn!(url, cause, "proxied admin request failed");
    (
        StatusCode::BAD_GATEWAY,
        format!("request to mosdns failed: {}", cause),
    )
        .into_response()
}
