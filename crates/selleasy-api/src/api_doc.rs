//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use selleasy_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SellEasy API",
        version = "0.1.0",
        description = "Marketplace listing API: create listings with media attachments, browse them newest first, and fetch the stored media binaries."
    ),
    paths(
        handlers::product_create::create_product,
        handlers::product_get::list_products,
        handlers::product_get::get_product,
        handlers::media_download::download_media,
    ),
    components(schemas(
        models::Product,
        models::ProductMedia,
        models::MediaKind,
        models::Category,
        models::CreateProduct,
        error::ErrorResponse,
    )),
    tags(
        (name = "products", description = "Listing management endpoints"),
        (name = "media", description = "Stored media delivery")
    )
)]
pub struct ApiDoc;
