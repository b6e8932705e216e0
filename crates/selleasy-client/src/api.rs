//! Domain methods for the listing API.

use anyhow::{Context, Result};
use serde::Deserialize;

use selleasy_core::constants::MEDIA_FIELD_NAME;
use selleasy_core::models::{CreateProduct, Product};

use crate::ApiClient;

/// One media attachment of a create request, ready for the wire.
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Create response. The server returns the full product; only the id is
/// needed to acknowledge the listing and re-fetch the grid.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    pub id: i32,
}

impl ApiClient {
    /// Fetch all listings, newest first.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.get("/api/products", &[]).await
    }

    /// Fetch one listing by id. The server counts this as a view.
    pub async fn get_product(&self, id: i32) -> Result<Product> {
        self.get(&format!("/api/products/{}", id), &[]).await
    }

    /// Create a listing from the validated fields plus its media files.
    /// Text parts and one file part per attachment go out in a single
    /// multipart request.
    pub async fn create_product(
        &self,
        input: &CreateProduct,
        files: Vec<MediaPart>,
    ) -> Result<CreatedProduct> {
        let mut form = reqwest::multipart::Form::new()
            .text("title", input.title.clone())
            .text("price", input.price.to_string())
            .text("description", input.description.clone())
            .text("category", input.category.clone());

        for file in files {
            let part = reqwest::multipart::Part::bytes(file.data)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .context("Invalid media content type")?;
            form = form.part(MEDIA_FIELD_NAME, part);
        }

        self.post_multipart("/api/products", form).await
    }
}
