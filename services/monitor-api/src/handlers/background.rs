//! Background image endpoints for the dashboard UI.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Multipart, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::background::allowed_extension;
use crate::state::AppState;

/// Multipart field the UI uploads the image under.
const UPLOAD_FIELD: &str = "background_image";

#[derive(Serialize)]
pub struct BackgroundStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct UploadError {
    pub error: String,
}

/// GET /api/background_status - whether a custom background is set.
pub async fn background_status_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<BackgroundStatus> {
    match state.backgrounds.current().await {
        Some(filename) => Json(BackgroundStatus {
            status: "custom".to_string(),
            url: Some(format!("/backgrounds/{}", filename)),
        }),
        None => Json(BackgroundStatus {
            status: "default".to_string(),
            url: None,
        }),
    }
}

/// POST /api/upload_background - multipart upload of a new background image.
pub async fn upload_background_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return bad_request("no file selected");
        }
        let Some(ext) = allowed_extension(&filename) else {
            return bad_request("file type not allowed");
        };

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => return bad_request(&format!("failed to read upload: {}", e)),
        };

        return match state.backgrounds.save(&ext, &data).await {
            Ok(stored) => Json(UploadResponse {
                success: true,
                url: Some(format!("/backgrounds/{}", stored)),
                message: None,
            })
            .into_response(),
            Err(e) => {
                error!(error = %e, "failed to store background");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(UploadError {
                        error: format!("failed to store file: {}", e),
                    }),
                )
                    .into_response()
            }
        };
    }

    bad_request("missing background_image file part")
}

/// POST /api/remove_background - delete the custom background if present.
pub async fn remove_background_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    match state.backgrounds.remove().await {
        Ok(removed) => Json(UploadResponse {
            success: true,
            url: None,
            message: (!removed).then(|| "no custom background to remove".to_string()),
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "failed to remove background");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UploadError {
                    error: format!("failed to remove file: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /backgrounds/:filename - serve the stored background image.
///
/// Only the store's own filenames are ever valid, which also rules out path
/// traversal through the route parameter.
pub async fn serve_background_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    let current = state.backgrounds.current().await;
    if current.as_deref() != Some(filename.as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(state.backgrounds.path_of(&filename)).await {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type_for(&filename))
            .body(Body::from(bytes))
            .unwrap(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(UploadError {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("custom_background.png"), "image/png");
        assert_eq!(content_type_for("custom_background.jpg"), "image/jpeg");
        assert_eq!(content_type_for("custom_background.webp"), "image/webp");
        assert_eq!(content_type_for("weird"), "application/octet-stream");
    }
}
