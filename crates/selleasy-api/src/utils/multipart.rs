//! Multipart form extraction for the create listing endpoint.

use axum::extract::Multipart;
use selleasy_core::constants::MEDIA_FIELD_NAME;
use selleasy_core::AppError;

/// A media binary lifted out of the multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Text fields and media files of a listing submission.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub files: Vec<UploadedFile>,
}

/// Extract the listing fields and media parts from a multipart body.
///
/// Text parts fill the matching form field; parts named `media` become files.
/// Limits are enforced while reading, so a request over the file count or an
/// oversized part fails before later parts are buffered. Unknown fields are
/// drained and ignored.
pub async fn extract_listing_form(
    mut multipart: Multipart,
    max_files: usize,
    max_file_size: usize,
) -> Result<ListingForm, AppError> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart form: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == MEDIA_FIELD_NAME {
            if form.files.len() >= max_files {
                return Err(AppError::TooManyFiles(format!(
                    "Up to {} files can be attached",
                    max_files
                )));
            }

            let filename = field
                .file_name()
                .map(|s: &str| s.to_string())
                .unwrap_or_default();
            let content_type = field
                .content_type()
                .map(|s: &str| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            if data.len() > max_file_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File size exceeds maximum allowed size of {} MB",
                    max_file_size / 1024 / 1024
                )));
            }

            form.files.push(UploadedFile {
                filename,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(|e| {
            AppError::InvalidInput(format!("Failed to read field '{}': {}", field_name, e))
        })?;

        match field_name.as_str() {
            "title" => form.title = value,
            "price" => form.price = value,
            "description" => form.description = value,
            "category" => form.category = value,
            _ => {}
        }
    }

    Ok(form)
}

/// Storage filename for an uploaded media part: a fresh UUID plus the most
/// trustworthy extension available (original filename first, then the MIME
/// subtype).
pub fn unique_media_filename(original: &str, content_type: &str) -> String {
    let ext = extension_of(original)
        .or_else(|| extension_from_content_type(content_type))
        .unwrap_or("bin");
    format!("{}.{}", uuid::Uuid::new_v4(), ext.to_ascii_lowercase())
}

fn extension_of(filename: &str) -> Option<&str> {
    let ext = filename.rsplit_once('.')?.1;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header::CONTENT_TYPE, Request};

    const BOUNDARY: &str = "test-boundary";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(filename: &str, content_type: &str, len: usize) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"media\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{}\r\n",
            "x".repeat(len)
        )
    }

    async fn multipart_from(parts: &[String]) -> Multipart {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let request = Request::builder()
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_collects_fields_and_files() {
        let multipart = multipart_from(&[
            text_part("title", "Desk Lamp"),
            text_part("price", "19.99"),
            text_part("description", "A sturdy lamp for any desk"),
            text_part("category", "home"),
            file_part("lamp.jpg", "image/jpeg", 8),
            file_part("clip.mp4", "video/mp4", 8),
        ])
        .await;

        let form = extract_listing_form(multipart, 5, 1024).await.unwrap();
        assert_eq!(form.title, "Desk Lamp");
        assert_eq!(form.price, "19.99");
        assert_eq!(form.description, "A sturdy lamp for any desk");
        assert_eq!(form.category, "home");
        assert_eq!(form.files.len(), 2);
        assert_eq!(form.files[0].filename, "lamp.jpg");
        assert_eq!(form.files[0].content_type, "image/jpeg");
        assert_eq!(form.files[0].data, b"x".repeat(8));
        assert_eq!(form.files[1].filename, "clip.mp4");
    }

    #[tokio::test]
    async fn test_media_part_over_count_limit_rejected() {
        let parts: Vec<String> = (0..3)
            .map(|i| file_part(&format!("f{}.png", i), "image/png", 4))
            .collect();
        let multipart = multipart_from(&parts).await;

        let err = extract_listing_form(multipart, 2, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::TooManyFiles(_)));
        assert_eq!(err.to_string(), "Too many files: Up to 2 files can be attached");
    }

    #[tokio::test]
    async fn test_oversized_media_part_rejected() {
        let multipart = multipart_from(&[
            file_part("ok.png", "image/png", 16),
            file_part("big.png", "image/png", 17),
        ])
        .await;

        let err = extract_listing_form(multipart, 5, 16).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn test_unknown_fields_ignored() {
        let multipart = multipart_from(&[
            text_part("title", "Desk Lamp"),
            text_part("tracking_pixel", "ignored"),
        ])
        .await;

        let form = extract_listing_form(multipart, 5, 1024).await.unwrap();
        assert_eq!(form.title, "Desk Lamp");
        assert!(form.files.is_empty());
    }

    #[test]
    fn test_unique_filename_prefers_original_extension() {
        let name = unique_media_filename("photo.JPG", "image/png");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), 36 + 4);
    }

    #[test]
    fn test_unique_filename_falls_back_to_content_type() {
        let name = unique_media_filename("photo", "image/webp");
        assert!(name.ends_with(".webp"));

        let name = unique_media_filename("archive.tar.gz!", "video/quicktime");
        assert!(name.ends_with(".mov"));
    }

    #[test]
    fn test_unique_filename_defaults_to_bin() {
        let name = unique_media_filename("", "application/x-thing");
        assert!(name.ends_with(".bin"));
    }
}
