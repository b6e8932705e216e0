//! Stored media download handler.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use selleasy_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::MediaConfig;

/// Serve a stored media binary.
///
/// The route wildcard captures the full storage key (`media/{filename}`),
/// which is exactly the path segment upload embedded in the recorded URL.
/// Stored files never change once written, so responses are marked immutable
/// for caches.
#[utoipa::path(
    get,
    path = "/media/{key}",
    tag = "media",
    params(("key" = String, Path, description = "Storage key of the media file")),
    responses(
        (status = 200, description = "The media binary"),
        (status = 404, description = "Unknown storage key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(media), fields(operation = "download_media", key = %key))]
pub async fn download_media(
    State(media): State<MediaConfig>,
    Path(key): Path<String>,
) -> Result<Response, HttpAppError> {
    let data = media.storage.download(&key).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_key(&key))
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from(data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })?;

    Ok(response)
}

/// Content type by file extension. The local backend does not persist content
/// types, and every stored filename carries the extension chosen at upload.
fn content_type_for_key(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for_key("media/a.jpg"), "image/jpeg");
        assert_eq!(content_type_for_key("media/a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for_key("media/b.png"), "image/png");
        assert_eq!(content_type_for_key("media/c.mp4"), "video/mp4");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(content_type_for_key("media/a.dat"), "application/octet-stream");
        assert_eq!(content_type_for_key("media/no-extension"), "application/octet-stream");
    }
}
