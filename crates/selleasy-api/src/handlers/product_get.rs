//! Listing read handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use selleasy_core::models::Product;
use selleasy_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DbState;

/// List every product, newest first, each with its media.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses(
        (status = 200, description = "All listings, newest first", body = [Product]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db), fields(operation = "list_products"))]
pub async fn list_products(State(db): State<DbState>) -> Result<Json<Vec<Product>>, HttpAppError> {
    let products = db.products.list_with_media().await?;
    Ok(Json(products))
}

/// Fetch one product by id. Every detail fetch counts as a view.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "The listing, views already incremented", body = Product),
        (status = 404, description = "Unknown product id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db), fields(operation = "get_product", product_id = %id))]
pub async fn get_product(
    State(db): State<DbState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, HttpAppError> {
    let product = db
        .products
        .increment_views(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    Ok(Json(product))
}
