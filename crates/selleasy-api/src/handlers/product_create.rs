//! Create listing handler.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use selleasy_core::models::{CreateProduct, MediaKind, NewProductMedia, Product};
use selleasy_core::AppError;
use validator::Validate;

use crate::error::{storage_error, ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::multipart::{extract_listing_form, unique_media_filename};

/// Create a listing from a multipart submission.
///
/// Text parts carry the form fields; parts named `media` carry the binaries.
/// Media is written to storage first, then the product row and its media rows
/// are inserted in one transaction. When any step fails after files were
/// written, the uploaded files are deleted best-effort in the background so
/// storage does not accumulate orphans.
///
/// # Errors
/// - `AppError::InvalidInput` - Malformed multipart body or non-numeric price
/// - `AppError::Validation` - Field values outside the listing schema
/// - `AppError::PayloadTooLarge` / `AppError::TooManyFiles` - Media limits exceeded
/// - `AppError::Storage` / `AppError::Database` - Persistence failure
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing created", body = Product),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_product"))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>), HttpAppError> {
    let form =
        extract_listing_form(multipart, state.media.max_files, state.media.max_file_size).await?;

    let price: f64 = form
        .price
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput("Price must be a number".to_string()))?;

    let input = CreateProduct {
        title: form.title,
        price,
        description: form.description,
        category: form.category,
    };
    input.validate().map_err(AppError::from)?;

    let mut media = Vec::with_capacity(form.files.len());
    let mut uploaded_keys = Vec::with_capacity(form.files.len());
    for file in form.files {
        let filename = unique_media_filename(&file.filename, &file.content_type);
        match state
            .media
            .storage
            .upload(&filename, &file.content_type, file.data)
            .await
        {
            Ok((key, url)) => {
                uploaded_keys.push(key);
                media.push(NewProductMedia {
                    url,
                    kind: MediaKind::from_content_type(&file.content_type),
                });
            }
            Err(err) => {
                cleanup_uploads(state.clone(), uploaded_keys);
                return Err(storage_error(err).into());
            }
        }
    }

    let product = match state.db.products.create_with_media(&input, media).await {
        Ok(product) => product,
        Err(err) => {
            cleanup_uploads(state.clone(), uploaded_keys);
            return Err(err.into());
        }
    };

    Ok((StatusCode::CREATED, Json(product)))
}

/// Best-effort removal of uploaded files after a failed create.
fn cleanup_uploads(state: Arc<AppState>, keys: Vec<String>) {
    if keys.is_empty() {
        return;
    }
    tokio::spawn(async move {
        for key in keys {
            if let Err(err) = state.media.storage.delete(&key).await {
                tracing::warn!(key = %key, error = %err, "Failed to clean up uploaded media");
            }
        }
    });
}
